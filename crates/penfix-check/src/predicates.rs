use std::collections::HashSet;

use penfix_core::surface::definitions;

fn defined_variables(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    definitions(&chars).into_iter().map(|d| d.variable).collect()
}

/// Paren depth never goes negative and ends at zero.
pub fn balanced(text: &str) -> bool {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// No variable is defined by more than one `(var /` header.
pub fn unique_variables(text: &str) -> bool {
    let vars = defined_variables(text);
    let distinct: HashSet<&String> = vars.iter().collect();
    distinct.len() == vars.len()
}

/// Variables defined more than once, each listed once, in the order their
/// second definition appears.
pub fn duplicate_variables(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for var in defined_variables(text) {
        if !seen.insert(var.clone()) && reported.insert(var.clone()) {
            duplicates.push(var);
        }
    }
    duplicates
}

/// True when the text has a defect: some variable is defined twice.
pub fn duplicate_nodes(text: &str) -> bool {
    let duplicates = duplicate_variables(text);
    if duplicates.is_empty() {
        return false;
    }
    tracing::debug!(?duplicates, "duplicate node definitions");
    true
}

/// Every `(var / concept` pair starts with the same letter, compared
/// case-insensitively. Text without any definition fails.
pub fn naming_convention(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let defs = definitions(&chars);
    if defs.is_empty() {
        return false;
    }
    defs.iter().all(|def| {
        let Some(concept) = &def.concept else {
            return false;
        };
        let var_first = def.variable.chars().next().map(|c| c.to_lowercase().to_string());
        let concept_first = concept.chars().next().map(|c| c.to_lowercase().to_string());
        var_first.is_some() && var_first == concept_first
    })
}
