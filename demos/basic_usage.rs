// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic redisearch-om usage example.
//!
//! Demonstrates:
//! 1. Declaring an entity and customizing its schema
//! 2. Creating the index from the derived schema
//! 3. Adding documents
//! 4. Fluent search queries (text + numeric + sorting)
//! 5. Retrieval by id (the multi-get fast path)
//!
//! # Prerequisites
//!
//! A Redis instance with the RediSearch module on localhost:6379:
//! ```bash
//! docker run -p 6379:6379 redislabs/redisearch:1.6.16
//! ```
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use std::collections::HashMap;

use redisearch_om::{
    DecodeError, GeoPosition, GeoTerm, GeoUnit, NumericTerm, PropertyDescriptor, QueryBuilder,
    SchemaBuilder, SchemaError, SearchClient, SearchEntity, SortingOrder, ValueKind,
};

#[derive(Debug, Clone)]
struct Car {
    id: i32,
    make: String,
    model: String,
    price: f64,
    location: GeoPosition,
}

impl SearchEntity for Car {
    fn entity_name() -> &'static str {
        "Car"
    }

    fn properties() -> &'static [PropertyDescriptor] {
        const PROPS: &[PropertyDescriptor] = &[
            PropertyDescriptor::new("Id", ValueKind::Integer),
            PropertyDescriptor::new("Make", ValueKind::Text),
            PropertyDescriptor::new("Model", ValueKind::Text),
            PropertyDescriptor::new("Price", ValueKind::Float),
            PropertyDescriptor::new("Location", ValueKind::Geo),
        ];
        PROPS
    }

    fn configure_schema(builder: &mut SchemaBuilder) -> Result<(), SchemaError> {
        builder.property("Make")?.not_stemmed();
        builder.property("Price")?.sortable();
        Ok(())
    }

    fn to_search_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Id", self.id.to_string()),
            ("Make", self.make.clone()),
            ("Model", self.model.clone()),
            ("Price", self.price.to_string()),
            ("Location", self.location.to_string()),
        ]
    }

    fn from_search_fields(fields: &HashMap<String, String>) -> Result<Self, DecodeError> {
        Ok(Car {
            id: redisearch_om::parse_field(fields, "Id")?,
            make: redisearch_om::parse_field(fields, "Make")?,
            model: redisearch_om::parse_field(fields, "Model")?,
            price: redisearch_om::parse_field(fields, "Price")?,
            location: redisearch_om::parse_field(fields, "Location")?,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    println!("Connecting to Redis...");
    let mut client = SearchClient::connect("redis://127.0.0.1:6379").await?;

    // ─────────────────────────────────────────────────────────────────────
    // 1. Create the index from the derived schema
    // ─────────────────────────────────────────────────────────────────────
    // cars-index: Id NUMERIC, Make TEXT NOSTEM, Model TEXT,
    //             Price NUMERIC SORTABLE, Location GEO
    let created = client.create_index::<Car>().await?;
    println!("Index created: {created} (false = already exists)");

    // ─────────────────────────────────────────────────────────────────────
    // 2. Add a few documents
    // ─────────────────────────────────────────────────────────────────────
    let cars = [
        Car {
            id: 1,
            make: "Kia".into(),
            model: "Ceed".into(),
            price: 14_000.0,
            location: GeoPosition::new(19.03991, 47.49801),
        },
        Car {
            id: 2,
            make: "Kia".into(),
            model: "Sportage".into(),
            price: 27_000.0,
            location: GeoPosition::new(19.03991, 47.49801),
        },
        Car {
            id: 3,
            make: "Opel".into(),
            model: "Astra".into(),
            price: 16_000.0,
            location: GeoPosition::new(17.6504, 47.0912),
        },
    ];
    for car in &cars {
        client.add_document(car, 1.0, None).await?;
    }
    println!("Added {} documents", cars.len());

    // ─────────────────────────────────────────────────────────────────────
    // 3. Ranked search: kia under 20k, cheapest first
    // ─────────────────────────────────────────────────────────────────────
    let query = QueryBuilder::<Car>::new()
        .where_field("Make")?
        .must_match("kia")?
        .and_field("Price")?
        .must_match(NumericTerm::between(0.0, 20_000.0))?
        .sort_by("Price", SortingOrder::Ascending)?
        .build();

    println!("\nKias under 20k:");
    for hit in client.search(&query).await? {
        let car = hit.entity;
        println!("  {} {} - {} EUR", car.make, car.model, car.price);
    }

    // ─────────────────────────────────────────────────────────────────────
    // 4. Geo search: anything within 5 km of Budapest
    // ─────────────────────────────────────────────────────────────────────
    let query = QueryBuilder::<Car>::new()
        .where_field("Location")?
        .must_match(GeoTerm::within_distance_of(
            19.03991,
            47.49801,
            5.0,
            GeoUnit::Kilometers,
        ))?
        .build();

    println!("\nCars near Budapest:");
    for hit in client.search(&query).await? {
        println!("  {} {}", hit.entity.make, hit.entity.model);
    }

    // ─────────────────────────────────────────────────────────────────────
    // 5. Retrieval by id - runs as FT.MGET, no ranking involved
    // ─────────────────────────────────────────────────────────────────────
    let query = QueryBuilder::<Car>::new().with_ids([1, 3])?.build();
    println!("\nBy id:");
    for hit in client.search(&query).await? {
        println!("  #{} {} {}", hit.entity.id, hit.entity.make, hit.entity.model);
    }

    Ok(())
}
