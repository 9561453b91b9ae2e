//! Restaurant review records and loading.

mod loader;

pub use loader::{load_reviews, read_reviews};

use serde::{Deserialize, Serialize};

/// A single restaurant review as found in the reviews dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Rating")]
    pub rating: u8,
    #[serde(rename = "Review")]
    pub review: String,
}

impl Review {
    /// Text that gets embedded and handed to the model.
    pub fn page_content(&self) -> String {
        format!("{} {}", self.title, self.review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_content_joins_title_and_body() {
        let review = Review {
            title: "Best slice in town".to_string(),
            date: "2024-03-02".to_string(),
            rating: 5,
            review: "Crispy crust and fresh basil.".to_string(),
        };
        assert_eq!(review.page_content(), "Best slice in town Crispy crust and fresh basil.");
    }
}
