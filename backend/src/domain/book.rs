//! Book catalogue data model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::account::Username;

/// Reviews keyed by the reviewing account, at most one entry per username.
pub type ReviewMap = BTreeMap<Username, String>;

/// A catalogue entry.
///
/// ## Invariants
/// - `id` is the stable catalogue key; the catalogue itself never grows or
///   shrinks after seeding, only `reviews` mutates.
/// - `reviews` holds at most one entry per username (upsert semantics).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    #[schema(example = "1")]
    pub id: String,
    #[schema(example = "Things Fall Apart")]
    pub title: String,
    #[schema(example = "Chinua Achebe")]
    pub author: String,
    #[schema(value_type = Object, example = json!({"fraser": "great read"}))]
    pub reviews: ReviewMap,
}

impl Book {
    /// Build a review-less catalogue entry.
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            reviews: ReviewMap::new(),
        }
    }
}

/// The fixed catalogue seeded at startup, in stable id order.
pub fn classic_catalogue() -> Vec<Book> {
    vec![
        Book::new("1", "Things Fall Apart", "Chinua Achebe"),
        Book::new("2", "Fairy tales", "Hans Christian Andersen"),
        Book::new("3", "The Divine Comedy", "Dante Alighieri"),
        Book::new("4", "The Epic Of Gilgamesh", "Unknown"),
        Book::new("5", "The Book Of Job", "Unknown"),
        Book::new("6", "One Thousand and One Nights", "Unknown"),
        Book::new("7", "Njál's Saga", "Unknown"),
        Book::new("8", "Pride and Prejudice", "Jane Austen"),
        Book::new("9", "Le Père Goriot", "Honoré de Balzac"),
        Book::new(
            "10",
            "Molloy, Malone Dies, The Unnamable, the trilogy",
            "Samuel Beckett",
        ),
    ]
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn seed_preserves_id_order() {
        let books = classic_catalogue();
        let ids: Vec<&str> = books.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]);
    }

    #[test]
    fn seeded_books_start_without_reviews() {
        assert!(classic_catalogue().iter().all(|b| b.reviews.is_empty()));
    }

    #[test]
    fn book_serialises_reviews_as_object() {
        let mut book = Book::new("8", "Pride and Prejudice", "Jane Austen");
        book.reviews.insert(
            Username::new("fraser").expect("valid username"),
            "great read".to_owned(),
        );
        let value = serde_json::to_value(&book).expect("serialise");
        assert_eq!(
            value["reviews"]["fraser"],
            serde_json::json!("great read")
        );
    }
}
