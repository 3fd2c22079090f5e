//! `amdm classify <url>` – check whether a URL is a downloadable Apple Music link.

use amdm_core::classify::classify;
use anyhow::Result;

/// Prints the classified kind on success; exits nonzero for anything that is
/// not a valid Apple Music link, so scripts can gate on the result.
pub fn run_classify(url: &str) -> Result<()> {
    let classification = classify(url);
    if !classification.is_valid {
        anyhow::bail!(
            "not an Apple Music link: {url} \
             (expected https://music.apple.com/<storefront>/<type>/<name>/<id>)"
        );
    }
    println!("{}: {}", classification.content_type.label(), url);
    Ok(())
}
