use std::{
    fmt,
    io::{self, Write},
    path::PathBuf,
    str::FromStr,
};

use clap::Parser;
use colored::Colorize;
use library_catalog::{BookStatus, LibraryError, LibraryStore, SearchQuery};

/// Command-line arguments for the catalog binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON file holding the library data
    #[arg(short, long, default_value = "library.json")]
    file: PathBuf,
}

/// Failures surfaced to the menu loop by a single action
#[derive(Debug)]
enum ActionError {
    /// The user typed something that could not be parsed
    Input(String),
    /// The store rejected the operation
    Store(LibraryError),
    /// Reading from or writing to the terminal failed
    Io(io::Error),
}

impl From<LibraryError> for ActionError {
    fn from(err: LibraryError) -> Self {
        Self::Store(err)
    }
}

impl From<io::Error> for ActionError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(reason) => write!(f, "input error: {reason}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "terminal error: {err}"),
        }
    }
}

fn main() {
    let args = Args::parse();
    let store = LibraryStore::new(args.file);

    run_menu(&store);

    // Flush the current state to disk on the way out, whatever happened
    // inside the loop.
    match store.list().and_then(|books| store.save(&books)) {
        Ok(()) => println!("{}", "Changes saved. Goodbye.".green()),
        Err(err) => eprintln!("{} {err}", "Failed to save on exit:".red()),
    }
}

/// Drive the interactive menu until the user exits or input runs out
fn run_menu(store: &LibraryStore) {
    loop {
        print_menu();

        let Ok(choice) = prompt("Choose an action (1-6): ") else {
            println!();
            break;
        };

        let result = match choice.as_str() {
            "1" => add_book(store),
            "2" => remove_book(store),
            "3" => search_books(store),
            "4" => list_books(store),
            "5" => update_status(store),
            "6" => {
                println!("Exiting.");
                break;
            }
            _ => {
                println!("{}", "Invalid choice, try again.".yellow());
                Ok(())
            }
        };

        // A bad input or a store failure never terminates the session.
        if let Err(err) = result {
            println!("{} {err}", "Error:".red());
        }
    }
}

/// Print the numbered action menu
fn print_menu() {
    println!("\n{}", "--- Library Catalog ---".cyan().bold());
    println!("1. Add a book");
    println!("2. Remove a book");
    println!("3. Search for books");
    println!("4. List all books");
    println!("5. Update a book's status");
    println!("6. Exit");
}

/// Read one trimmed line of input, failing when input is exhausted
fn prompt(label: &str) -> Result<String, ActionError> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    let bytes = io::stdin().read_line(&mut line)?;
    if bytes == 0 {
        return Err(ActionError::Input("input is exhausted".to_string()));
    }

    Ok(line.trim().to_string())
}

/// Parse a numeric field typed by the user
fn parse_number<T: FromStr>(input: &str, field: &str) -> Result<T, ActionError> {
    input
        .parse()
        .map_err(|_| ActionError::Input(format!("expected a number for the {field}, got '{input}'")))
}

/// Prompt for the new book's fields and add it to the collection
fn add_book(store: &LibraryStore) -> Result<(), ActionError> {
    let title = prompt("Enter the book title: ")?;
    if title.is_empty() {
        return Err(ActionError::Input("the title must not be empty".to_string()));
    }

    let author = prompt("Enter the book author: ")?;
    if author.is_empty() {
        return Err(ActionError::Input("the author must not be empty".to_string()));
    }

    let year = parse_number::<i32>(&prompt("Enter the publication year: ")?, "year")?;

    let book = store.add(&title, &author, year)?;
    println!("{} {book}", "Added:".green());
    Ok(())
}

/// Prompt for an id and remove the matching book
fn remove_book(store: &LibraryStore) -> Result<(), ActionError> {
    let id = parse_number::<u64>(&prompt("Enter the id of the book to remove: ")?, "id")?;

    if store.remove(id)? {
        println!("{}", "Book removed.".green());
    } else {
        println!("{}", format!("No book with id {id}.").yellow());
    }
    Ok(())
}

/// Prompt for optional filters and print the matching books
fn search_books(store: &LibraryStore) -> Result<(), ActionError> {
    let title = prompt("Title to look for (or leave blank): ")?;
    let author = prompt("Author to look for (or leave blank): ")?;
    let year_input = prompt("Publication year (or leave blank): ")?;
    let year = if year_input.is_empty() {
        None
    } else {
        Some(parse_number::<i32>(&year_input, "year")?)
    };

    let query = SearchQuery {
        title: (!title.is_empty()).then_some(title),
        author: (!author.is_empty()).then_some(author),
        year,
    };

    let results = store.search(&query)?;
    if results.is_empty() {
        println!("{}", "No books found.".yellow());
    } else {
        for book in &results {
            println!("{book}");
        }
    }
    Ok(())
}

/// Print every book in the collection
fn list_books(store: &LibraryStore) -> Result<(), ActionError> {
    let books = store.list()?;
    if books.is_empty() {
        println!("{}", "The library is empty.".yellow());
    } else {
        for book in &books {
            println!("{book}");
        }
    }
    Ok(())
}

/// Prompt for an id and a status label and update the matching book
fn update_status(store: &LibraryStore) -> Result<(), ActionError> {
    let id = parse_number::<u64>(&prompt("Enter the id of the book to update: ")?, "id")?;
    let status: BookStatus = prompt("New status ('available' or 'checked-out'): ")?.parse()?;

    if store.update_status(id, status)? {
        println!("{}", "Status updated.".green());
    } else {
        println!("{}", format!("No book with id {id}.").yellow());
    }
    Ok(())
}
