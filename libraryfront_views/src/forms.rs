use once_cell::sync::Lazy;
use regex::Regex;

use libraryfront_catalog::api::{BookPayload, BookRecord};
use libraryfront_catalog::error::LibraryError;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r".+@.+\..+").expect("valid email pattern"));

const MIN_PASSWORD_LENGTH: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), LibraryError> {
        if !is_valid_email(&self.email) {
            return Err(LibraryError::validation("Please enter a valid email"));
        }
        if self.password.is_empty() {
            return Err(LibraryError::validation("Please enter your password"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), LibraryError> {
        if self.name.trim().is_empty() {
            return Err(LibraryError::validation("Please enter your name"));
        }
        if !is_valid_email(&self.email) {
            return Err(LibraryError::validation("Please enter a valid email"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(LibraryError::validation(
                "Password must be at least 6 characters",
            ));
        }
        if self.password != self.confirm {
            return Err(LibraryError::validation("Passwords do not match"));
        }
        Ok(())
    }
}

/// Raw text of the admin book form, coerced into a payload on submit
#[derive(Debug, Clone, PartialEq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub quantity: String,
    pub available: String,
    pub cover: String,
    /// Comma separated
    pub genres: String,
    pub book_type: String,
    pub status: String,
    pub rating: String,
    pub summary: String,
    pub recommended: bool,
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            isbn: String::new(),
            quantity: "1".to_string(),
            available: "1".to_string(),
            cover: String::new(),
            genres: String::new(),
            book_type: String::new(),
            status: String::new(),
            rating: String::new(),
            summary: String::new(),
            recommended: false,
        }
    }
}

impl BookForm {
    /// Pre-fills the form for editing, missing counts default to one copy
    pub fn from_record(book: &BookRecord) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone().unwrap_or_default(),
            isbn: book.isbn.clone().unwrap_or_default(),
            quantity: book.quantity.unwrap_or(1).to_string(),
            available: book.available.unwrap_or(1).to_string(),
            cover: book.cover.clone().unwrap_or_default(),
            genres: book.genres.join(", "),
            book_type: book.book_type.clone().unwrap_or_default(),
            status: book.status.clone().unwrap_or_default(),
            rating: book.rating.map(|rating| rating.to_string()).unwrap_or_default(),
            summary: book.summary.clone().unwrap_or_default(),
            recommended: book.recommended.unwrap_or_default(),
        }
    }

    pub fn to_payload(&self) -> Result<BookPayload, LibraryError> {
        for (value, field) in [
            (&self.title, "Title"),
            (&self.author, "Author"),
            (&self.isbn, "ISBN"),
        ] {
            if value.trim().is_empty() {
                return Err(LibraryError::validation(format!("{} is required", field)));
            }
        }

        let rating = match self.rating.trim() {
            "" => None,
            rating => Some(
                rating
                    .parse::<f64>()
                    .ok()
                    .filter(|rating| rating.is_finite())
                    .ok_or_else(|| LibraryError::validation("Rating must be a number"))?,
            ),
        };

        Ok(BookPayload {
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: self.isbn.clone(),
            quantity: parse_count(&self.quantity, "Quantity")?,
            available: parse_count(&self.available, "Available")?,
            cover: self.cover.clone(),
            genres: split_genres(&self.genres),
            book_type: self.book_type.clone(),
            status: self.status.clone(),
            rating,
            summary: self.summary.clone(),
            recommended: self.recommended,
        })
    }
}

fn parse_count(value: &str, field: &str) -> Result<u32, LibraryError> {
    value.trim().parse::<u32>().map_err(|_| {
        LibraryError::validation(format!("{} must be a non-negative whole number", field))
    })
}

pub fn split_genres(genres: &str) -> Vec<String> {
    genres
        .split(',')
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod forms_tests {
    use libraryfront_catalog::api::BookRecord;
    use libraryfront_catalog::error::LibraryError;

    use crate::forms::{split_genres, BookForm, LoginForm, RegisterForm};

    fn filled_book_form() -> BookForm {
        BookForm {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: "9780441013593".to_string(),
            quantity: " 3 ".to_string(),
            available: "2".to_string(),
            genres: "Sci-Fi, , Classic ,".to_string(),
            rating: "8.5".to_string(),
            ..BookForm::default()
        }
    }

    #[test]
    fn test_login_validation() {
        let form = LoginForm {
            email: "ann@example".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(
            form.validate(),
            Err(LibraryError::Validation(
                "Please enter a valid email".to_string()
            ))
        );

        let form = LoginForm {
            email: "ann@example.com".to_string(),
            password: String::new(),
        };
        assert_eq!(
            form.validate(),
            Err(LibraryError::Validation(
                "Please enter your password".to_string()
            ))
        );
    }

    #[test]
    fn test_register_validation_order() {
        let mut form = RegisterForm {
            name: "  ".to_string(),
            email: "ann@example.com".to_string(),
            password: "12345".to_string(),
            confirm: "123456".to_string(),
        };
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Please enter your name"
        );

        form.name = "Ann".to_string();
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Password must be at least 6 characters"
        );

        form.password = "123456".to_string();
        form.confirm = "654321".to_string();
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Passwords do not match"
        );

        form.confirm = "123456".to_string();
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn test_book_form_coerces_payload() {
        let payload = filled_book_form().to_payload().expect("Invalid form");
        assert_eq!(payload.quantity, 3);
        assert_eq!(payload.available, 2);
        assert_eq!(payload.genres, vec!["Sci-Fi", "Classic"]);
        assert_eq!(payload.rating, Some(8.5));

        let unrated = BookForm {
            rating: " ".to_string(),
            ..filled_book_form()
        };
        assert_eq!(unrated.to_payload().unwrap().rating, None);
    }

    #[test]
    fn test_book_form_rejects_bad_input() {
        let missing_isbn = BookForm {
            isbn: String::new(),
            ..filled_book_form()
        };
        assert_eq!(
            missing_isbn.to_payload().unwrap_err().to_string(),
            "ISBN is required"
        );

        let negative = BookForm {
            quantity: "-1".to_string(),
            ..filled_book_form()
        };
        assert!(matches!(
            negative.to_payload(),
            Err(LibraryError::Validation(..))
        ));

        let bad_rating = BookForm {
            rating: "great".to_string(),
            ..filled_book_form()
        };
        assert_eq!(
            bad_rating.to_payload().unwrap_err().to_string(),
            "Rating must be a number"
        );
    }

    #[test]
    fn test_edit_prefills_from_record() {
        let book = BookRecord {
            genres: vec!["Mystery".to_string(), "Fantasy".to_string()],
            rating: Some(9.0),
            ..BookRecord::new("Lord of the Mysteries")
        };
        let form = BookForm::from_record(&book);
        assert_eq!(form.genres, "Mystery, Fantasy");
        assert_eq!(form.quantity, "1");
        assert_eq!(form.rating, "9");
        assert_eq!(split_genres(&form.genres), book.genres);
    }
}
