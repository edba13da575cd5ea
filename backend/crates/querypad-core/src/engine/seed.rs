/// Demo schema and sample rows loaded into the shared dataset at startup.
pub const SEED_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
  id INTEGER PRIMARY KEY,
  name TEXT NOT NULL,
  email TEXT UNIQUE,
  total_spent REAL DEFAULT 0,
  join_date TEXT
);

CREATE TABLE IF NOT EXISTS orders (
  id INTEGER PRIMARY KEY,
  customer_id INTEGER,
  order_date TEXT,
  amount REAL,
  FOREIGN KEY(customer_id) REFERENCES customers(id)
);

INSERT OR IGNORE INTO customers (id, name, email, total_spent, join_date) VALUES
  (1, 'John Doe', 'john@example.com', 1200.50, '2023-01-15'),
  (2, 'Jane Smith', 'jane@example.com', 850.75, '2023-02-20'),
  (3, 'Bob Johnson', 'bob@example.com', 2100.25, '2022-11-10'),
  (4, 'Alice Brown', 'alice@example.com', 450.30, '2023-03-05'),
  (5, 'Charlie Wilson', 'charlie@example.com', 1500.60, '2022-12-18');

INSERT OR IGNORE INTO orders (customer_id, order_date, amount) VALUES
  (1, '2023-03-10', 250.50),
  (1, '2023-04-15', 350.75),
  (2, '2023-03-20', 150.25),
  (3, '2023-02-25', 800.30),
  (3, '2023-03-15', 650.45),
  (4, '2023-04-05', 200.10),
  (5, '2023-03-30', 450.60),
  (5, '2023-04-10', 350.25);

CREATE TABLE IF NOT EXISTS Authors (
  AuthorID INTEGER PRIMARY KEY AUTOINCREMENT,
  FirstName TEXT NOT NULL,
  LastName TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Genres (
  GenreID INTEGER PRIMARY KEY AUTOINCREMENT,
  GenreName TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS Publishers (
  PublisherID INTEGER PRIMARY KEY AUTOINCREMENT,
  PublisherName TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS Books (
  BookID INTEGER PRIMARY KEY AUTOINCREMENT,
  Title TEXT NOT NULL,
  AuthorID INTEGER NOT NULL,
  GenreID INTEGER NOT NULL,
  PublisherID INTEGER NOT NULL,
  PublicationYear INTEGER,
  ISBN TEXT UNIQUE,
  FOREIGN KEY (AuthorID) REFERENCES Authors(AuthorID),
  FOREIGN KEY (GenreID) REFERENCES Genres(GenreID),
  FOREIGN KEY (PublisherID) REFERENCES Publishers(PublisherID)
);

CREATE TABLE IF NOT EXISTS Patrons (
  PatronID INTEGER PRIMARY KEY AUTOINCREMENT,
  FirstName TEXT NOT NULL,
  LastName TEXT NOT NULL,
  Address TEXT,
  PhoneNumber TEXT,
  Email TEXT UNIQUE
);

CREATE TABLE IF NOT EXISTS Loans (
  LoanID INTEGER PRIMARY KEY AUTOINCREMENT,
  BookID INTEGER NOT NULL,
  PatronID INTEGER NOT NULL,
  LoanDate DATE NOT NULL,
  DueDate DATE NOT NULL,
  ReturnDate DATE,
  FOREIGN KEY (BookID) REFERENCES Books(BookID),
  FOREIGN KEY (PatronID) REFERENCES Patrons(PatronID)
);

INSERT OR IGNORE INTO Authors (FirstName, LastName) VALUES
  ('Jane', 'Austen'),
  ('George', 'Orwell'),
  ('J.R.R.', 'Tolkien');

INSERT OR IGNORE INTO Genres (GenreName) VALUES
  ('Fiction'),
  ('Science Fiction'),
  ('Fantasy');

INSERT OR IGNORE INTO Publishers (PublisherName) VALUES
  ('Penguin Classics'),
  ('Houghton Mifflin Harcourt');

INSERT OR IGNORE INTO Books (Title, AuthorID, GenreID, PublisherID, PublicationYear, ISBN) VALUES
  ('Pride and Prejudice', 1, 1, 1, 1813, '978-0141439518'),
  ('Nineteen Eighty-Four', 2, 2, 1, 1949, '978-0451524935'),
  ('The Hobbit', 3, 3, 2, 1937, '978-0547928227');

INSERT OR IGNORE INTO Patrons (FirstName, LastName, Address, PhoneNumber, Email) VALUES
  ('John', 'Doe', '123 Main St', '555-1234', 'john.doe@example.com'),
  ('Jane', 'Smith', '456 Oak Ave', '555-5678', 'jane.smith@example.com');

INSERT OR IGNORE INTO Loans (BookID, PatronID, LoanDate, DueDate, ReturnDate) VALUES
  (1, 1, '2023-01-01', '2023-01-15', '2023-01-14'),
  (2, 2, '2023-02-01', '2023-02-15', NULL);
"#;
