pub mod config;
pub mod run;
pub mod simulate;

/// Cards shown when no items are given on the command line
pub const DEFAULT_ITEMS: [&str; 7] = [
    "Aurora", "Basalt", "Cirrus", "Dune", "Ember", "Fjord", "Glacier",
];

/// Items from the command line, or the built-in deck
pub fn items_or_default(items: Vec<String>) -> Vec<String> {
    if items.is_empty() {
        DEFAULT_ITEMS.iter().map(|s| s.to_string()).collect()
    } else {
        items
    }
}
