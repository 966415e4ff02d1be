use serde::{Deserialize, Serialize};

pub type BookId = String;
pub type UserId = String;

/// Placeholder shown wherever a book has no rating
pub const MISSING_RATING_LABEL: &str = "-";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Struct representing a single book, either fetched from the API or bundled with the application.
/// Only books fetched from the API carry an identity, the rest are informational-only.
pub struct BookRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<BookId>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub book_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub genres: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient::rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::count",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient::count",
        skip_serializing_if = "Option::is_none"
    )]
    pub available: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended: Option<bool>,
}

impl BookRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Title with surrounding whitespace trimmed and case folded, used as a de-duplication key
    pub fn normalized_title(&self) -> String {
        normalize_title(&self.title)
    }

    pub fn quantity_or_zero(&self) -> u32 {
        self.quantity.unwrap_or_default()
    }

    pub fn available_or_zero(&self) -> u32 {
        self.available.unwrap_or_default()
    }

    /// Available copies as counted in aggregates, never more than the quantity when both are known
    pub fn counted_available(&self) -> u32 {
        match (self.quantity, self.available) {
            (Some(quantity), Some(available)) => available.min(quantity),
            (_, available) => available.unwrap_or_default(),
        }
    }

    pub fn rating_label(&self) -> String {
        self.rating
            .map(|rating| rating.to_string())
            .unwrap_or_else(|| MISSING_RATING_LABEL.to_string())
    }
}

pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Remote records are loosely typed: nulls, numbers sent as strings and negative counts
/// are coerced instead of failing the whole response.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::api::BookRecord;

    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    fn number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|number| number.is_finite())
    }

    /// Null or absent stays unknown, anything else that is not a positive number counts as 0
    pub fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(match number(&value) {
            Some(count) if count > 0.0 => count.min(f64::from(u32::MAX)) as u32,
            _ => 0,
        }))
    }

    pub fn rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(number(&Value::deserialize(deserializer)?))
    }

    /// Records that still cannot be read are skipped, the rest of the list is kept
    pub fn records<'de, D>(deserializer: D) -> Result<Vec<BookRecord>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values: Vec<Value> = null_as_default(deserializer)?;
        Ok(values
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(book) => Some(book),
                Err(err) => {
                    tracing::warn!("Skipping unreadable book record: {}", err);
                    None
                }
            })
            .collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Body of create and update requests, produced from the admin book form
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub quantity: u32,
    pub available: u32,
    pub cover: String,
    pub genres: Vec<String>,
    #[serde(rename = "type")]
    pub book_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub summary: String,
    pub recommended: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowedBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Struct representing a borrow record, only the nested return status is used by the frontend
pub struct BorrowRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<BorrowedBook>,
}

impl BorrowRecord {
    pub fn with_return_date(return_date: impl Into<String>) -> Self {
        Self {
            book: Some(BorrowedBook {
                return_date: Some(return_date.into()),
            }),
        }
    }

    /// A record is outstanding unless its return status is literally "returned"
    pub fn is_outstanding(&self) -> bool {
        let return_date = self
            .book
            .as_ref()
            .and_then(|book| book.return_date.as_deref())
            .unwrap_or_default();
        !return_date.eq_ignore_ascii_case("returned")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Librarian,
    Borrower,
    Other(String),
}

impl Default for Role {
    fn default() -> Self {
        Role::Borrower
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Admin" => Role::Admin,
            "Librarian" => Role::Librarian,
            "Borrower" => Role::Borrower,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => "Admin".to_string(),
            Role::Librarian => "Librarian".to_string(),
            Role::Borrower => "Borrower".to_string(),
            Role::Other(other) => other,
        }
    }
}

impl Role {
    /// Admins and librarians may use the book management console
    pub fn can_manage_books(&self) -> bool {
        matches!(self, Role::Admin | Role::Librarian)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub data: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetAllBooksResponse {
    #[serde(default, deserialize_with = "lenient::records")]
    pub books: Vec<BookRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookResponse {
    pub book: BookRecord,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecordsResponse {
    #[serde(default)]
    pub borrow_records: Vec<BorrowRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeResponse {
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    pub book_id: BookId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub user_id: UserId,
    pub book_id: BookId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod api_tests {
    use serde_json::json;

    use crate::api::{
        BookRecord, BorrowRecord, BorrowRecordsResponse, GetAllBooksResponse, Role, User,
    };

    #[test]
    fn test_book_record_reads_remote_shape() {
        let book: BookRecord = serde_json::from_value(json!({
            "_id": "65f1c0a2b3d4e5f6a7b8c9d0",
            "title": "Dune",
            "type": "NOVEL",
            "genres": ["Sci-Fi"],
            "quantity": 3,
            "available": 1
        }))
        .expect("Failed to deserialize book");

        assert_eq!(
            book.identity.as_deref(),
            Some("65f1c0a2b3d4e5f6a7b8c9d0")
        );
        assert_eq!(book.book_type.as_deref(), Some("NOVEL"));
        assert_eq!(book.author, None);
        assert_eq!(book.rating_label(), "-");
    }

    #[test]
    fn test_book_record_coerces_loose_fields() {
        let book: BookRecord = serde_json::from_value(json!({
            "title": null,
            "genres": null,
            "quantity": "3",
            "available": -1,
            "rating": "8.5"
        }))
        .expect("Failed to deserialize book");

        assert_eq!(book.title, "");
        assert!(book.genres.is_empty());
        assert_eq!(book.quantity, Some(3));
        assert_eq!(book.available, Some(0));
        assert_eq!(book.rating, Some(8.5));

        let book: BookRecord = serde_json::from_value(json!({
            "title": "Loose",
            "quantity": "many",
            "available": null,
            "rating": "n/a"
        }))
        .expect("Failed to deserialize book");
        assert_eq!(book.quantity, Some(0));
        assert_eq!(book.available, None);
        assert_eq!(book.rating, None);
    }

    #[test]
    fn test_unreadable_records_are_skipped() {
        let response: GetAllBooksResponse = serde_json::from_value(json!({
            "books": [{"title": "Dune"}, "oops", {"title": "Anathem", "genres": "Sci-Fi"}]
        }))
        .expect("Failed to deserialize books");
        let titles: Vec<&str> = response.books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune"]);

        let response: GetAllBooksResponse =
            serde_json::from_value(json!({"books": null})).expect("Failed to deserialize books");
        assert!(response.books.is_empty());
    }

    #[test]
    fn test_counted_available_never_exceeds_quantity() {
        let book = BookRecord {
            quantity: Some(2),
            available: Some(5),
            ..BookRecord::new("Overstocked")
        };
        assert_eq!(book.counted_available(), 2);

        let no_quantity = BookRecord {
            available: Some(4),
            ..BookRecord::new("Loose")
        };
        assert_eq!(no_quantity.counted_available(), 4);
        assert_eq!(BookRecord::new("Static").counted_available(), 0);
    }

    #[test]
    fn test_borrow_record_outstanding() {
        let response: BorrowRecordsResponse = serde_json::from_value(json!({
            "borrowRecords": [
                {"book": {"returnDate": "RETURNED"}},
                {"book": {"returnDate": "2024-05-01"}},
                {"book": {}},
                {}
            ]
        }))
        .expect("Failed to deserialize borrow records");

        let outstanding: Vec<bool> = response
            .borrow_records
            .iter()
            .map(BorrowRecord::is_outstanding)
            .collect();
        assert_eq!(outstanding, vec![false, true, true, true]);
    }

    #[test]
    fn test_user_role_round_trip_keeps_unknown_roles() {
        let user: User = serde_json::from_value(json!({
            "name": "Ann",
            "email": "ann@example.com",
            "role": "Archivist"
        }))
        .expect("Failed to deserialize user");
        assert_eq!(user.role, Role::Other("Archivist".to_string()));
        assert!(!user.role.can_manage_books());
        assert_eq!(json!(user.role), json!("Archivist"));
        assert_eq!(json!(Role::Librarian), json!("Librarian"));
    }
}
