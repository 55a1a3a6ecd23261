use once_cell::sync::Lazy;
use regex::Regex;

/// Extension of generated step code files.
pub const GENERATED_EXT: &str = "js";

static STEP_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i-u)^step-([a-z0-9]+)\.{}$", GENERATED_EXT))
        .expect("step file pattern is valid")
});

/// Extract the step id from a generated file name, or `None` if the name
/// does not follow `step-<id>.js` exactly.
pub fn parse_step_file(name: &str) -> Option<&str> {
    STEP_FILE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
