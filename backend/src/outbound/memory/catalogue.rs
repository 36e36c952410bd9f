//! In-memory book catalogue seeded at startup.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::account::Username;
use crate::domain::book::{classic_catalogue, Book, ReviewMap};
use crate::domain::ports::BookCatalogue;

/// Mutex-guarded list of catalogue entries preserving seed order.
///
/// The catalogue is small and fixed, so lookups are linear scans; every
/// read-modify-write of a review map happens under one lock acquisition so
/// the upsert invariant holds across concurrent requests.
pub struct InMemoryCatalogue {
    inner: Mutex<Vec<Book>>,
}

impl InMemoryCatalogue {
    /// Build a catalogue from an explicit seed.
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            inner: Mutex::new(books),
        }
    }

    /// Build the catalogue with the classic ten-entry seed.
    pub fn with_classic_seed() -> Self {
        Self::new(classic_catalogue())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Book>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BookCatalogue for InMemoryCatalogue {
    async fn list_all(&self) -> Vec<Book> {
        self.lock().clone()
    }

    async fn get_by_id(&self, id: &str) -> Option<Book> {
        self.lock().iter().find(|book| book.id == id).cloned()
    }

    async fn get_by_author(&self, author: &str) -> Vec<Book> {
        self.lock()
            .iter()
            .filter(|book| book.author == author)
            .cloned()
            .collect()
    }

    async fn get_by_title(&self, title: &str) -> Vec<Book> {
        let needle = title.to_lowercase();
        self.lock()
            .iter()
            .filter(|book| book.title.to_lowercase() == needle)
            .cloned()
            .collect()
    }

    async fn get_reviews(&self, id: &str) -> Option<ReviewMap> {
        self.lock()
            .iter()
            .find(|book| book.id == id)
            .map(|book| book.reviews.clone())
    }

    async fn upsert_review(&self, id: &str, username: &Username, text: &str) -> bool {
        let mut books = self.lock();
        let Some(book) = books.iter_mut().find(|book| book.id == id) else {
            return false;
        };
        book.reviews.insert(username.clone(), text.to_owned());
        true
    }

    async fn delete_review(&self, id: &str, username: &Username) -> bool {
        let mut books = self.lock();
        let Some(book) = books.iter_mut().find(|book| book.id == id) else {
            return false;
        };
        book.reviews.remove(username).is_some()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn catalogue() -> InMemoryCatalogue {
        InMemoryCatalogue::with_classic_seed()
    }

    fn fraser() -> Username {
        Username::new("fraser").expect("valid username")
    }

    #[tokio::test]
    async fn list_all_returns_the_seed_in_order() {
        let books = catalogue().list_all().await;
        assert_eq!(books.len(), 10);
        assert_eq!(books[0].title, "Things Fall Apart");
        assert_eq!(books[9].author, "Samuel Beckett");
    }

    #[rstest]
    #[case("1", Some("Things Fall Apart"))]
    #[case("10", Some("Molloy, Malone Dies, The Unnamable, the trilogy"))]
    #[case("11", None)]
    #[case("", None)]
    #[tokio::test]
    async fn get_by_id_is_exact(#[case] id: &str, #[case] expected: Option<&str>) {
        let found = catalogue().get_by_id(id).await;
        assert_eq!(found.map(|b| b.title), expected.map(str::to_owned));
    }

    #[rstest]
    #[case("Unknown", 3)]
    #[case("Jane Austen", 1)]
    // Author matching is strict equality: case and diacritics both count.
    #[case("jane austen", 0)]
    #[case("Honore de Balzac", 0)]
    #[case("Honoré de Balzac", 1)]
    #[tokio::test]
    async fn get_by_author_is_case_sensitive_equality(#[case] author: &str, #[case] hits: usize) {
        assert_eq!(catalogue().get_by_author(author).await.len(), hits);
    }

    #[rstest]
    #[case("Pride and Prejudice", 1)]
    #[case("pride and prejudice", 1)]
    #[case("PRIDE AND PREJUDICE", 1)]
    // Equality, not substring: a prefix of a real title finds nothing.
    #[case("Pride", 0)]
    #[case(" Pride and Prejudice", 0)]
    #[tokio::test]
    async fn get_by_title_is_case_insensitive_equality(#[case] title: &str, #[case] hits: usize) {
        assert_eq!(catalogue().get_by_title(title).await.len(), hits);
    }

    #[tokio::test]
    async fn reviews_distinguish_absent_book_from_empty_map() {
        let catalogue = catalogue();
        assert!(catalogue.get_reviews("404").await.is_none());
        let empty = catalogue.get_reviews("1").await.expect("book exists");
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let catalogue = catalogue();
        assert!(catalogue.upsert_review("1", &fraser(), "solid").await);
        let once = catalogue.get_reviews("1").await.expect("book exists");
        assert!(catalogue.upsert_review("1", &fraser(), "solid").await);
        let twice = catalogue.get_reviews("1").await.expect("book exists");
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn upsert_overwrites_per_username() {
        let catalogue = catalogue();
        assert!(catalogue.upsert_review("1", &fraser(), "x").await);
        assert!(catalogue.upsert_review("1", &fraser(), "y").await);
        let reviews = catalogue.get_reviews("1").await.expect("book exists");
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews.get(&fraser()).map(String::as_str), Some("y"));
    }

    #[tokio::test]
    async fn upsert_on_missing_book_fails() {
        assert!(!catalogue().upsert_review("404", &fraser(), "x").await);
    }

    #[tokio::test]
    async fn delete_review_covers_both_absence_cases() {
        let catalogue = catalogue();
        // Absent book.
        assert!(!catalogue.delete_review("404", &fraser()).await);
        // Existing book, no review by this user.
        assert!(!catalogue.delete_review("1", &fraser()).await);
        assert!(catalogue.upsert_review("1", &fraser(), "x").await);
        assert!(catalogue.delete_review("1", &fraser()).await);
        // Deleting twice fails the second time.
        assert!(!catalogue.delete_review("1", &fraser()).await);
        let reviews = catalogue.get_reviews("1").await.expect("book exists");
        assert!(!reviews.contains_key(&fraser()));
    }
}
