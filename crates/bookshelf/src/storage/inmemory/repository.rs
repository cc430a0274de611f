//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use bookshelf_core::library::{Author, Book, BookAuthor, NewAuthor, NewBook};
use bookshelf_core::storage::{
    AuthorRepository, BookRepository, Pagination, RepositoryError, Result,
};

/// In-memory storage backend.
///
/// Maps are keyed by ID so iteration yields ascending ID order. When both maps
/// are needed the authors lock is taken first.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    authors: Arc<RwLock<BTreeMap<i64, Author>>>,
    books: Arc<RwLock<BTreeMap<i64, Book>>>,
    next_author_id: Arc<AtomicI64>,
    next_book_id: Arc<AtomicI64>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository. IDs start at 1.
    pub fn new() -> Self {
        Self {
            authors: Arc::new(RwLock::new(BTreeMap::new())),
            books: Arc::new(RwLock::new(BTreeMap::new())),
            next_author_id: Arc::new(AtomicI64::new(1)),
            next_book_id: Arc::new(AtomicI64::new(1)),
        }
    }

    fn page<T: Clone>(map: &BTreeMap<i64, T>, pagination: Pagination) -> Vec<T> {
        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        map.values()
            .skip(offset)
            .take(pagination.limit() as usize)
            .cloned()
            .collect()
    }
}

fn dangling_author(author_id: i64) -> RepositoryError {
    RepositoryError::InvalidData(format!(
        "Foreign key constraint violation for Book: no Author with id {author_id}"
    ))
}

#[async_trait]
impl AuthorRepository for InMemoryRepository {
    async fn get_author(&self, id: i64) -> Result<Option<Author>> {
        let authors = self.authors.read().await;
        Ok(authors.get(&id).cloned())
    }

    async fn list_authors(&self, pagination: Pagination) -> Result<Vec<Author>> {
        let authors = self.authors.read().await;
        Ok(Self::page(&authors, pagination))
    }

    async fn create_author(&self, author: &NewAuthor) -> Result<Author> {
        let mut authors = self.authors.write().await;
        let id = self.next_author_id.fetch_add(1, Ordering::SeqCst);
        let author = author.clone().into_author(id);
        authors.insert(id, author.clone());
        Ok(author)
    }

    async fn update_author(&self, author: &Author) -> Result<()> {
        let mut authors = self.authors.write().await;
        match authors.get_mut(&author.id) {
            Some(stored) => {
                *stored = author.clone();
                Ok(())
            }
            None => Err(RepositoryError::not_found("Author", author.id)),
        }
    }

    async fn delete_author(&self, id: i64) -> Result<()> {
        let mut authors = self.authors.write().await;
        let mut books = self.books.write().await;

        if authors.remove(&id).is_none() {
            return Err(RepositoryError::not_found("Author", id));
        }
        books.retain(|_, book| book.author_id != Some(id));

        Ok(())
    }
}

#[async_trait]
impl BookRepository for InMemoryRepository {
    async fn get_book(&self, id: i64) -> Result<Option<Book>> {
        let books = self.books.read().await;
        Ok(books.get(&id).cloned())
    }

    async fn list_books(&self, pagination: Pagination) -> Result<Vec<Book>> {
        let books = self.books.read().await;
        Ok(Self::page(&books, pagination))
    }

    async fn list_books_by_author(&self, author_id: i64) -> Result<Vec<Book>> {
        let books = self.books.read().await;
        Ok(books
            .values()
            .filter(|book| book.author_id == Some(author_id))
            .cloned()
            .collect())
    }

    async fn create_book(&self, book: &NewBook) -> Result<Book> {
        let mut authors = self.authors.write().await;
        let mut books = self.books.write().await;

        let author_id = match &book.author {
            None => None,
            Some(BookAuthor::Existing(author_id)) => {
                if !authors.contains_key(author_id) {
                    return Err(dangling_author(*author_id));
                }
                Some(*author_id)
            }
            Some(BookAuthor::New(new_author)) => {
                let id = self.next_author_id.fetch_add(1, Ordering::SeqCst);
                authors.insert(id, new_author.clone().into_author(id));
                Some(id)
            }
        };

        let id = self.next_book_id.fetch_add(1, Ordering::SeqCst);
        let book = book.clone().into_book(id, author_id);
        books.insert(id, book.clone());
        Ok(book)
    }

    async fn update_book(&self, book: &Book) -> Result<()> {
        let authors = self.authors.read().await;
        let mut books = self.books.write().await;

        if let Some(author_id) = book.author_id {
            if !authors.contains_key(&author_id) {
                return Err(dangling_author(author_id));
            }
        }

        match books.get_mut(&book.id) {
            Some(stored) => {
                *stored = book.clone();
                Ok(())
            }
            None => Err(RepositoryError::not_found("Book", book.id)),
        }
    }

    async fn delete_book(&self, id: i64) -> Result<()> {
        let mut books = self.books.write().await;
        if books.remove(&id).is_none() {
            return Err(RepositoryError::not_found("Book", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemoryRepository, Author) {
        let repo = InMemoryRepository::new();
        let author = repo
            .create_author(&NewAuthor::new("Jules", "Verne"))
            .await
            .unwrap();
        (repo, author)
    }

    #[tokio::test]
    async fn test_ids_are_assigned_in_order() {
        let repo = InMemoryRepository::new();

        let first = repo.create_author(&NewAuthor::new("A", "A")).await.unwrap();
        let second = repo.create_author(&NewAuthor::new("B", "B")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.get_author(2).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_list_authors_pages_by_ascending_id() {
        let repo = InMemoryRepository::new();
        for i in 1..=5 {
            repo.create_author(&NewAuthor::new(format!("F{i}"), format!("L{i}")))
                .await
                .unwrap();
        }

        let page = repo.list_authors(Pagination::new(2, 2)).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 4]);

        let past_end = repo.list_authors(Pagination::new(4, 2)).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_author_is_not_found() {
        let repo = InMemoryRepository::new();

        let result = repo.update_author(&Author::new(9, "No", "One")).await;

        assert_eq!(result, Err(RepositoryError::not_found("Author", 9)));
    }

    #[tokio::test]
    async fn test_create_book_with_existing_author() {
        let (repo, author) = seeded().await;

        let book = repo
            .create_book(
                &NewBook::new("Around the World", "80 days")
                    .with_author(BookAuthor::Existing(author.id)),
            )
            .await
            .unwrap();

        assert_eq!(book.author_id, Some(author.id));
        assert_eq!(repo.list_books_by_author(author.id).await.unwrap(), vec![book]);
    }

    #[tokio::test]
    async fn test_create_book_with_missing_author_stores_nothing() {
        let repo = InMemoryRepository::new();

        let result = repo
            .create_book(&NewBook::new("Orphan", "").with_author(BookAuthor::Existing(42)))
            .await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
        assert!(repo.list_books(Pagination::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_book_with_inline_author() {
        let repo = InMemoryRepository::new();

        let book = repo
            .create_book(
                &NewBook::new("Michel Strogoff", "Courier of the Czar")
                    .with_author(BookAuthor::New(NewAuthor::new("Jules", "Verne"))),
            )
            .await
            .unwrap();

        let author_id = book.author_id.unwrap();
        let author = repo.get_author(author_id).await.unwrap().unwrap();
        assert_eq!(author.last_name, "Verne");
    }

    #[tokio::test]
    async fn test_delete_author_cascades_to_books() {
        let (repo, author) = seeded().await;
        let other = repo.create_author(&NewAuthor::new("H.G.", "Wells")).await.unwrap();

        repo.create_book(&NewBook::new("A", "").with_author(BookAuthor::Existing(author.id)))
            .await
            .unwrap();
        let kept = repo
            .create_book(&NewBook::new("B", "").with_author(BookAuthor::Existing(other.id)))
            .await
            .unwrap();
        let authorless = repo.create_book(&NewBook::new("C", "")).await.unwrap();

        repo.delete_author(author.id).await.unwrap();

        assert!(repo.get_author(author.id).await.unwrap().is_none());
        let remaining = repo.list_books(Pagination::new(1, 50)).await.unwrap();
        assert_eq!(remaining, vec![kept, authorless]);
    }

    #[tokio::test]
    async fn test_update_book_detaches_author() {
        let (repo, author) = seeded().await;
        let book = repo
            .create_book(&NewBook::new("A", "").with_author(BookAuthor::Existing(author.id)))
            .await
            .unwrap();

        let detached = Book {
            author_id: None,
            ..book
        };
        repo.update_book(&detached).await.unwrap();

        assert_eq!(repo.get_book(detached.id).await.unwrap(), Some(detached));
    }

    #[tokio::test]
    async fn test_delete_missing_book_is_not_found() {
        let repo = InMemoryRepository::new();

        assert_eq!(
            repo.delete_book(5).await,
            Err(RepositoryError::not_found("Book", 5))
        );
    }
}
