//! Mock bio suggestion built from a fixed template.

/// Inputs captured when a suggestion is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub full_name: String,
    pub interests: String,
}

impl SuggestionRequest {
    pub fn new(full_name: &str, bio_text: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            interests: bio_text.trim().to_string(),
        }
    }

    /// Fill the template with the captured inputs.
    pub fn render(&self) -> String {
        format!(
            "Passionate and dedicated professional named {}, with interests in {}. Always eager to learn and grow.",
            self.full_name, self.interests
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_includes_name_and_trimmed_interests() {
        let bio = SuggestionRequest::new("Jane Doe", "  hiking and chess \n").render();
        assert_eq!(
            bio,
            "Passionate and dedicated professional named Jane Doe, with interests in hiking and chess. Always eager to learn and grow."
        );
    }

    #[test]
    fn deterministic() {
        let request = SuggestionRequest::new("A", "b");
        assert_eq!(request.render(), request.clone().render());
    }

    #[test]
    fn request_snapshot_is_independent_of_later_edits() {
        let mut bio_text = String::from("hiking");
        let request = SuggestionRequest::new("Jane", &bio_text);
        bio_text.push_str(" and sailing");
        assert!(request.render().contains("interests in hiking."));
    }
}
