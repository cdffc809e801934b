use crate::platform::Platform;
use regex::escape;

/// Render an `assetPatterns` regex template (spec §4.3/§3): `{{binary}}`,
/// `{{osToken}}`, `{{archToken}}` and the three GOOS/GOARCH case variants
/// are substituted with regex fragments before the template is compiled.
pub fn render_asset_pattern(template: &str, platform: &Platform, binary: &str) -> String {
    let os_alt = alternation(&platform.os_tokens());
    let arch_alt = alternation(&platform.arch_tokens());

    template
        .replace("{{binary}}", &escape(binary))
        .replace("{{osToken}}", &os_alt)
        .replace("{{archToken}}", &arch_alt)
        .replace("{{GOOS}}", &platform.goos.to_uppercase())
        .replace("{{Goos}}", &title_case(&platform.goos))
        .replace("{{goos}}", &platform.goos.to_lowercase())
        .replace("{{GOARCH}}", &platform.goarch.to_uppercase())
        .replace("{{Goarch}}", &title_case(&platform.goarch))
        .replace("{{goarch}}", &platform.goarch.to_lowercase())
}

/// Variables available when rendering a supplemental-asset template (spec
/// §4.4). These substitutions are exact strings compared for filename
/// equality, never regex fragments.
pub struct SupplementalVars<'a> {
    pub asset: String,
    pub base: String,
    pub binary: String,
    pub platform: &'a Platform,
    pub version: String,
    pub version_no_prefix: String,
}

pub fn render_supplemental(template: &str, vars: &SupplementalVars) -> String {
    template
        .replace("{{asset}}", &vars.asset)
        .replace("{{base}}", &vars.base)
        .replace("{{binary}}", &vars.binary)
        .replace("{{version}}", &vars.version)
        .replace("{{versionNoPrefix}}", &vars.version_no_prefix)
        .replace("{{GOOS}}", &vars.platform.goos.to_uppercase())
        .replace("{{Goos}}", &title_case(&vars.platform.goos))
        .replace("{{goos}}", &vars.platform.goos.to_lowercase())
        .replace("{{GOARCH}}", &vars.platform.goarch.to_uppercase())
        .replace("{{Goarch}}", &title_case(&vars.platform.goarch))
        .replace("{{goarch}}", &vars.platform.goarch.to_lowercase())
}

fn alternation(tokens: &[String]) -> String {
    let escaped: Vec<String> = tokens.iter().map(|t| escape(t)).collect();
    format!("(?:{})", escaped.join("|"))
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/discovery/template.rs"]
mod tests;
