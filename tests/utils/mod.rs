//! Shared fixtures for the integration tests
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use record_table::{FieldDescriptor, Record, Table};
use rust_decimal::Decimal;

/// Record with primitive fields only
#[derive(Debug, Clone, PartialEq, Record)]
#[record(name = "PrimitiveTestObject")]
pub struct PrimitiveTestObject {
    #[field(name = "Id")]
    pub id: i32,
    #[field(name = "Name")]
    pub name: String,
    #[field(name = "Amount")]
    pub amount: Decimal,
}

/// Record with two nested record fields
#[derive(Debug, Clone, PartialEq, Record)]
pub struct CustomObject {
    #[field(name = "Id")]
    pub id: i32,
    #[field(name = "Foo")]
    pub foo: Option<Foo>,
    #[field(name = "Bar")]
    pub bar: Option<Bar>,
    #[field(name = "Hot")]
    pub hot: bool,
}

#[derive(Debug, Clone, PartialEq, Record)]
pub struct Foo {
    #[field(name = "Name")]
    pub name: String,
    #[field(name = "Age")]
    pub age: i32,
}

#[derive(Debug, Clone, PartialEq, Record)]
pub struct Bar {
    #[field(name = "Tab")]
    pub tab: f64,
    #[field(name = "PayableNow")]
    pub payable_now: bool,
}

/// Nested record that itself holds a record, to check one-level flattening
#[derive(Debug, Clone, PartialEq, Record)]
pub struct Order {
    #[field(name = "Number")]
    pub number: i64,
    #[field(name = "Customer")]
    pub customer: Option<Customer>,
}

#[derive(Debug, Clone, PartialEq, Record)]
pub struct Customer {
    #[field(name = "Email")]
    pub email: Option<String>,
    #[field(name = "Address")]
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Record)]
pub struct Address {
    #[field(name = "City")]
    pub city: String,
}

/// Initialise test logging once
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Sequentially numbered primitive records: Id 1.., Name1.., Amount 1..
pub fn primitive_objects(count: usize) -> Vec<PrimitiveTestObject> {
    (1..=count)
        .map(|n| PrimitiveTestObject {
            id: n as i32,
            name: format!("Name{n}"),
            amount: Decimal::from(n as i64),
        })
        .collect()
}

pub fn foo(n: usize) -> Foo {
    Foo {
        name: format!("Name{n}"),
        age: n as i32,
    }
}

pub fn bar(n: usize) -> Bar {
    Bar {
        tab: n as f64 + 0.5,
        payable_now: n % 2 == 0,
    }
}

/// Sequentially numbered custom records with both nested values set
pub fn custom_objects(count: usize) -> Vec<CustomObject> {
    (1..=count)
        .map(|n| CustomObject {
            id: n as i32,
            foo: Some(foo(n)),
            bar: Some(bar(n)),
            hot: n % 2 == 1,
        })
        .collect()
}

/// Custom records with randomly absent nested values
pub fn random_custom_objects(count: usize, seed: u64) -> Vec<CustomObject> {
    let mut rng = StdRng::seed_from_u64(seed);
    (1..=count)
        .map(|n| CustomObject {
            id: rng.random_range(0..10_000),
            foo: rng.random_bool(0.7).then(|| Foo {
                name: format!("Name{}", rng.random_range(0..100)),
                age: rng.random_range(0..120),
            }),
            bar: rng.random_bool(0.5).then(|| bar(n)),
            hot: rng.random_bool(0.5),
        })
        .collect()
}

/// Descriptor of a field, panicking on unknown names
pub fn field<T: Record>(name: &str) -> FieldDescriptor {
    T::require_field(name).expect("fixture field exists")
}

/// Column names of a table, in order
pub fn column_names(table: &Table) -> Vec<&str> {
    table.columns().iter().map(|column| column.name()).collect()
}
