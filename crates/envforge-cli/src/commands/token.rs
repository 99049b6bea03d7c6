use envforge_core::UniqueToken;
use envforge_core::token::scope_digest;

pub fn token(scope: &[String], digest: bool) -> anyhow::Result<()> {
    let parts: Vec<&str> = scope.iter().map(String::as_str).collect();
    println!("{}", UniqueToken::derive(&parts));
    if digest {
        println!("sha256: {}", scope_digest(&parts));
    }
    Ok(())
}
