use anyhow::Result;

use medalwatch::countries;

/// Print the trackable countries in selection order
pub fn countries(json: bool) -> Result<()> {
    let list = countries::sorted_by_name();

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("Participating Countries ({})", list.len());
    println!("{:-<40}", "");
    for country in list {
        println!("  {:<5} {}", country.code, country.display_name);
    }

    Ok(())
}
