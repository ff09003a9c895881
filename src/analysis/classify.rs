use crate::document::model::{LayerBounds, SemanticType};

/// Pluggable `name/size -> category` function.
///
/// The keyword heuristic is the default; a learned model can be dropped in behind the same
/// trait without touching the analyzer or extraction.
pub trait LayerClassifier: Send + Sync {
    fn classify(&self, name: &str, bounds: &LayerBounds) -> SemanticType;
}

impl<F> LayerClassifier for F
where
    F: Fn(&str, &LayerBounds) -> SemanticType + Send + Sync,
{
    fn classify(&self, name: &str, bounds: &LayerBounds) -> SemanticType {
        self(name, bounds)
    }
}

/// Case-insensitive substring match, first rule wins. Unmatched names are `Unknown`.
const KEYWORD_RULES: &[(&str, SemanticType)] = &[
    ("background", SemanticType::Background),
    ("player", SemanticType::Player),
    ("character", SemanticType::Player),
    ("subject", SemanticType::Player),
    ("portrait", SemanticType::Player),
    ("stats", SemanticType::Stats),
    ("logo", SemanticType::Logo),
    ("effect", SemanticType::Effect),
    ("text", SemanticType::Text),
    ("title", SemanticType::Text),
    ("caption", SemanticType::Text),
    ("border", SemanticType::Border),
    ("frame", SemanticType::Border),
];

#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordClassifier;

impl LayerClassifier for KeywordClassifier {
    fn classify(&self, name: &str, _bounds: &LayerBounds) -> SemanticType {
        classify_name(name)
    }
}

pub fn classify_name(name: &str) -> SemanticType {
    let lower = name.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(kw, _)| lower.contains(kw))
        .map(|&(_, ty)| ty)
        .unwrap_or(SemanticType::Unknown)
}
