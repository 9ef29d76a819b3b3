use lootwheel_core::{Catalog, Category};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ArgError {
    #[error("unknown category {0:?}")]
    UnknownCategory(String),
    #[error("{0:?} is not a candidate of any selected category")]
    UnknownCandidate(String),
    #[error("expected name=value, got {0:?}")]
    MissingValue(String),
    #[error("invalid weight in {0:?}")]
    InvalidWeight(String),
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Expand a category list; `all` selects every category.
pub fn parse_categories(raw: &str) -> Result<Vec<Category>, ArgError> {
    let mut categories = Vec::new();
    for token in split_csv(raw) {
        let parsed = if token == "all" {
            Category::ALL.to_vec()
        } else {
            vec![Category::parse(&token).ok_or(ArgError::UnknownCategory(token))?]
        };
        for category in parsed {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
    }
    Ok(categories)
}

/// Resolve `category:candidate` or a bare candidate label to every
/// matching (category, candidate) pair among `within`.
pub fn resolve_candidate(
    catalog: &Catalog,
    within: &[Category],
    token: &str,
) -> Result<Vec<(Category, String)>, ArgError> {
    let (scope, label) = match token.split_once(':') {
        Some((category, label)) => {
            let category = Category::parse(category)
                .ok_or_else(|| ArgError::UnknownCategory(category.to_string()))?;
            (vec![category], label.trim())
        }
        None => (within.to_vec(), token.trim()),
    };
    let matches: Vec<(Category, String)> = scope
        .into_iter()
        .filter(|category| catalog.contains(*category, label))
        .map(|category| (category, label.to_string()))
        .collect();
    if matches.is_empty() {
        return Err(ArgError::UnknownCandidate(token.to_string()));
    }
    Ok(matches)
}

/// Parse `name=value` weight overrides.
pub fn parse_weight_overrides(raw: &str) -> Result<Vec<(String, f64)>, ArgError> {
    split_csv(raw)
        .into_iter()
        .map(|pair| {
            let (name, value) = pair
                .rsplit_once('=')
                .ok_or_else(|| ArgError::MissingValue(pair.clone()))?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| ArgError::InvalidWeight(pair.clone()))?;
            Ok((name.trim().to_string(), value))
        })
        .collect()
}
