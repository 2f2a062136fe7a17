/*
 * catalogs.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Typed records built by caller-defined accumulators.
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use xml_records::{Accumulator, ElementValue, FieldValue, FieldsAccumulator, RecordsBuilder};

/// Path of a document under `tests/fixtures`.
fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir).join("tests").join("fixtures").join(name)
}

fn load_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Cooking,
    Children,
    Web,
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COOKING" => Ok(Category::Cooking),
            "CHILDREN" => Ok(Category::Children),
            "WEB" => Ok(Category::Web),
            other => Err(format!("unknown category {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Book {
    category: Category,
    title: String,
    authors: Vec<String>,
    year: u16,
    price: f64,
}

/// Builds a [`Book`] when every field is present and parses.
#[derive(Debug, Default)]
struct BookAccumulator {
    title: Option<String>,
    authors: Vec<String>,
    year: Option<String>,
    price: Option<String>,
    category: Option<String>,
    closed: bool,
}

impl BookAccumulator {
    fn book(&self) -> Option<Book> {
        Some(Book {
            category: self.category.as_deref()?.parse().ok()?,
            title: self.title.clone()?,
            authors: self.authors.clone(),
            year: self.year.as_deref()?.parse().ok()?,
            price: self.price.as_deref()?.parse().ok()?,
        })
    }
}

impl Accumulator for BookAccumulator {
    type Record = Book;

    fn visit(&mut self, element: ElementValue) {
        if self.closed {
            // A rejected book is still here.
            self.reset();
        }
        let text = element.non_blank_text().map(str::to_string);
        match element.name.as_str() {
            "title" => self.title = text,
            "author" => self.authors.extend(text),
            "year" => self.year = text,
            "price" => self.price = text,
            "book" => {
                self.category = element.attribute("category").map(str::to_string);
                self.closed = true;
            }
            _ => {}
        }
    }

    fn can_produce(&self) -> bool {
        !self.authors.is_empty() && self.book().is_some()
    }

    fn produce(&mut self) -> Book {
        self.book().expect("can_produce checked the fields")
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[test]
fn test_books_from_catalogue() {
    let xml = load_fixture("books.xml");
    let books: Vec<Book> = RecordsBuilder::new()
        .from_text(&xml)
        .path("bookstore/book")
        .accumulator(BookAccumulator::default())
        .build()
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Everyday Italian",
            "Harry Potter",
            "XQuery Kick Start",
            "Learning XML"
        ]
    );

    assert_eq!(books[0].category, Category::Cooking);
    assert_eq!(books[0].authors, vec!["Giada De Laurentiis"]);
    assert_eq!(books[0].year, 2005);
    assert_eq!(books[0].price, 30.0);

    assert_eq!(books[1].category, Category::Children);
    assert_eq!(books[2].authors.len(), 5);
    assert_eq!(books[2].authors[4], "Vaidyanathan Nagarajan");
    assert_eq!(books[3].price, 39.95);
}

#[test]
fn test_invalid_books_are_counted_as_skipped() {
    let xml = load_fixture("books.xml");
    let mut records = RecordsBuilder::new()
        .from_text(&xml)
        .path("bookstore/book")
        .accumulator(BookAccumulator::default())
        .build()
        .unwrap();

    let count = records.by_ref().filter(Result::is_ok).count();
    assert_eq!(count, 4);
    assert_eq!(records.produced(), 4);
    // The unknown category and the book without a price.
    assert_eq!(records.skipped(), 2);
    assert!(records.is_released());
}

#[test]
fn test_books_as_fields() {
    let xml = load_fixture("books.xml");
    let records: Vec<_> = RecordsBuilder::new()
        .from_text(&xml)
        .path("bookstore/book")
        .accumulator(FieldsAccumulator::with_required(["price"]))
        .build()
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(records.len(), 5);
    assert_eq!(records[4].field("title"), Some("Unlisted Category"));
    match records[2].fields.get("author") {
        Some(FieldValue::Many(authors)) => assert_eq!(authors.len(), 5),
        other => panic!("expected five authors, got {:?}", other),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Filling {
    name: String,
    addcost: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct Donut {
    id: String,
    kind: String,
    name: String,
    ppu: f64,
    batters: Vec<String>,
    toppings: Vec<String>,
    fillings: Vec<Filling>,
}

/// Assembles a [`Donut`] from an `item` subtree.
///
/// Filling names and donut names share the element name `name`; the
/// donut's comes first in document order.
#[derive(Debug, Default)]
struct DonutAccumulator {
    id: Option<String>,
    kind: Option<String>,
    name: Option<String>,
    ppu: Option<f64>,
    batters: Vec<String>,
    toppings: Vec<String>,
    fillings: Vec<Filling>,
    pending_name: Option<String>,
    pending_cost: Option<f64>,
}

impl Accumulator for DonutAccumulator {
    type Record = Donut;

    fn visit(&mut self, element: ElementValue) {
        let text = element.non_blank_text().map(str::to_string);
        match element.name.as_str() {
            "name" => {
                if self.name.is_none() {
                    self.name = text.clone();
                }
                self.pending_name = text;
            }
            "ppu" => self.ppu = text.and_then(|t| t.parse().ok()),
            "batter" => self.batters.extend(text),
            "topping" => self.toppings.extend(text),
            "addcost" => self.pending_cost = text.and_then(|t| t.parse().ok()),
            "filling" => {
                if let Some(name) = self.pending_name.take() {
                    self.fillings.push(Filling {
                        name,
                        addcost: self.pending_cost.take().unwrap_or(0.0),
                    });
                }
            }
            "item" => {
                self.id = element.attribute("id").map(str::to_string);
                self.kind = element.attribute("type").map(str::to_string);
            }
            _ => {}
        }
    }

    fn can_produce(&self) -> bool {
        self.id.is_some() && self.name.is_some() && self.ppu.is_some()
    }

    fn produce(&mut self) -> Donut {
        Donut {
            id: self.id.take().unwrap_or_default(),
            kind: self.kind.take().unwrap_or_default(),
            name: self.name.take().unwrap_or_default(),
            ppu: self.ppu.take().unwrap_or_default(),
            batters: std::mem::take(&mut self.batters),
            toppings: std::mem::take(&mut self.toppings),
            fillings: std::mem::take(&mut self.fillings),
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[test]
fn test_donuts_with_nested_fillings() {
    let xml = load_fixture("donuts.xml");
    let donuts: Vec<Donut> = RecordsBuilder::new()
        .from_text(&xml)
        .path("items/item")
        .accumulator(DonutAccumulator::default())
        .build()
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(donuts.len(), 4);

    let cake = &donuts[0];
    assert_eq!(cake.id, "0001");
    assert_eq!(cake.name, "Cake");
    assert_eq!(cake.ppu, 0.55);
    assert_eq!(cake.batters, vec!["Regular", "Chocolate", "Blueberry"]);
    assert_eq!(cake.toppings, vec!["None", "Glazed", "Sugar"]);
    assert_eq!(
        cake.fillings,
        vec![
            Filling {
                name: "Custard".to_string(),
                addcost: 0.0
            },
            Filling {
                name: "Whipped Cream".to_string(),
                addcost: 0.0
            },
        ]
    );

    assert_eq!(donuts[1].name, "Raised");
    assert!(donuts[1].fillings.is_empty());
    assert_eq!(donuts[2].batters.len(), 2);

    let bar = &donuts[3];
    assert_eq!(bar.kind, "bar");
    assert_eq!(bar.name, "Bar");
    assert_eq!(bar.fillings.len(), 1);
    assert_eq!(bar.fillings[0].addcost, 0.25);
}

#[test]
fn test_donut_batters_by_deeper_path() {
    let xml = load_fixture("donuts.xml");
    let batters: Vec<String> = RecordsBuilder::new()
        .from_text(&xml)
        .path("items/item/batters/batter")
        .accumulator(xml_records::TextAccumulator::new())
        .build()
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(batters.len(), 7);
    assert_eq!(batters[3], "Regular");
}
