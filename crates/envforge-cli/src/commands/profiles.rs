use anyhow::bail;
use envforge_core::EnvironmentProfile;
use serde::Serialize;

/// TOML has no top-level arrays, so profiles go under `[[profile]]`.
#[derive(Serialize)]
struct ProfileTable<'a> {
    profile: &'a [EnvironmentProfile],
}

pub fn profiles(format: &str) -> anyhow::Result<()> {
    let profiles = EnvironmentProfile::all();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&profiles)?),
        "toml" => println!("{}", render_toml(&profiles)?),
        "text" => print!("{}", format_table(&profiles)),
        other => bail!("unsupported output format: {other} (expected text, json, or toml)"),
    }

    Ok(())
}

fn render_toml(profiles: &[EnvironmentProfile]) -> anyhow::Result<String> {
    Ok(toml::to_string_pretty(&ProfileTable { profile: profiles })?)
}

fn format_table(profiles: &[EnvironmentProfile]) -> String {
    let mut out = format!(
        "{:<8} {:>6} {:>5} {:>7} {:>4} {:>9} {:>4} {:>5} {:>7} {:>10}\n",
        "ENV", "RU/s", "FREE", "COMPUTE", "CAP", "SEARCH", "REP", "PART", "PUBLIC", "RETENTION"
    );
    for p in profiles {
        out.push_str(&format!(
            "{:<8} {:>6} {:>5} {:>7} {:>4} {:>9} {:>4} {:>5} {:>7} {:>10}\n",
            p.environment.as_str(),
            p.cosmos_throughput,
            yes_no(p.cosmos_free_tier),
            p.compute_sku.as_str(),
            p.compute_capacity,
            p.search_sku.as_str(),
            p.search_replicas,
            p.search_partitions,
            yes_no(p.public_network_access),
            p.log_retention_days,
        ));
    }
    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_table() {
        let table = format_table(&EnvironmentProfile::all());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("dev"));
        assert!(lines[3].contains("P1v3"));
    }

    #[test]
    fn test_toml_keeps_field_order() {
        let rendered = render_toml(&EnvironmentProfile::all()).unwrap();
        assert_eq!(rendered.matches("[[profile]]").count(), 3);

        let first: Vec<&str> = rendered
            .split("[[profile]]")
            .nth(1)
            .unwrap()
            .lines()
            .filter_map(|line| line.split_once(" = ").map(|(key, _)| key))
            .collect();
        assert_eq!(
            first,
            [
                "environment",
                "cosmos_throughput",
                "cosmos_free_tier",
                "compute_sku",
                "compute_capacity",
                "search_sku",
                "search_replicas",
                "search_partitions",
                "public_network_access",
                "log_retention_days",
            ]
        );
    }
}
