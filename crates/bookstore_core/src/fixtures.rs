//! crates/bookstore_core/src/fixtures.rs
//!
//! Seed data for a fresh store: the launch catalog and a few historical
//! orders so the admin dashboard is not empty on first run.

use chrono::{TimeZone, Utc};

use crate::domain::{Book, CartItem, Language, Order, OrderStatus};

/// The launch catalog of Kavithedal Publication.
pub fn seed_catalog() -> Vec<Book> {
    vec![
        Book {
            id: "b1".to_string(),
            title: "The Whispering Banyan".to_string(),
            author: "K. Arivazhagan".to_string(),
            genre: "Historical Fiction".to_string(),
            category: "Fiction".to_string(),
            price: 450.0,
            description: "A gripping tale set in 19th century Madurai, exploring the secrets hidden within an ancient family lineage and a mystical banyan tree.".to_string(),
            cover_url: "https://picsum.photos/300/450?random=1".to_string(),
            pages: 320,
            language: Language::Tamil,
            isbn: "978-81-93456-01-2".to_string(),
            stock: 45,
            sold: 120,
        },
        Book {
            id: "b2".to_string(),
            title: "Echoes of the Cauvery".to_string(),
            author: "Sarah Thomas".to_string(),
            genre: "Contemporary Fiction".to_string(),
            category: "Fiction".to_string(),
            price: 350.0,
            description: "A moving story about a young woman returning to her ancestral village along the Cauvery river to find herself amidst fading traditions.".to_string(),
            cover_url: "https://picsum.photos/300/450?random=2".to_string(),
            pages: 280,
            language: Language::English,
            isbn: "978-0-143-42567-8".to_string(),
            stock: 12,
            sold: 85,
        },
        Book {
            id: "b3".to_string(),
            title: "Modern Tamil Poetry: An Anthology".to_string(),
            author: "Various (Ed. Dr. R. Selvam)".to_string(),
            genre: "Poetry".to_string(),
            category: "Poetry".to_string(),
            price: 200.0,
            description: "A carefully curated collection of modern Tamil poetry reflecting the angst, joy, and resilience of the contemporary Tamil psyche.".to_string(),
            cover_url: "https://picsum.photos/300/450?random=3".to_string(),
            pages: 150,
            language: Language::Tamil,
            isbn: "978-81-234-5678-9".to_string(),
            stock: 3, // Low stock
            sold: 210,
        },
        Book {
            id: "b4".to_string(),
            title: "Digital Dravidian".to_string(),
            author: "S. Karthik".to_string(),
            genre: "Technology / Sociology".to_string(),
            category: "Non-Fiction".to_string(),
            price: 550.0,
            description: "An analysis of how the digital revolution has transformed the cultural landscape of South India.".to_string(),
            cover_url: "https://picsum.photos/300/450?random=4".to_string(),
            pages: 410,
            language: Language::English,
            isbn: "978-1-567-89012-3".to_string(),
            stock: 25,
            sold: 45,
        },
        Book {
            id: "b5".to_string(),
            title: "Flavors of Kongu".to_string(),
            author: "Meenakshi Ammal".to_string(),
            genre: "Cookbook".to_string(),
            category: "Non-Fiction".to_string(),
            price: 800.0,
            description: "A visual journey through the culinary heritage of the Kongu region, featuring 100+ authentic recipes.".to_string(),
            cover_url: "https://picsum.photos/300/450?random=5".to_string(),
            pages: 220,
            language: Language::English,
            isbn: "978-0-553-21311-9".to_string(),
            stock: 8,
            sold: 300,
        },
        Book {
            id: "b6".to_string(),
            title: "Vanathu Nila".to_string(),
            author: "J. Jayalalitha".to_string(),
            genre: "Romance".to_string(),
            category: "Fiction".to_string(),
            price: 299.0,
            description: "A heartwarming romance novel about star-crossed lovers separated by distance but united by the moon.".to_string(),
            cover_url: "https://picsum.photos/300/450?random=6".to_string(),
            pages: 240,
            language: Language::Tamil,
            isbn: "978-81-701-2345-6".to_string(),
            stock: 50,
            sold: 15,
        },
    ]
}

/// A handful of historical orders, snapshotted against the seed catalog.
pub fn seed_orders() -> Vec<Order> {
    let catalog = seed_catalog();
    vec![
        Order {
            id: "ORD-001".to_string(),
            customer_name: "Ramesh Kumar".to_string(),
            customer_email: "ramesh@example.com".to_string(),
            items: vec![
                CartItem {
                    book: catalog[0].clone(),
                    quantity: 1,
                },
                CartItem {
                    book: catalog[2].clone(),
                    quantity: 2,
                },
            ],
            total_amount: 850.0,
            status: OrderStatus::Delivered,
            payment_method: "UPI".to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, 10, 14, 30, 0).unwrap(),
        },
        Order {
            id: "ORD-002".to_string(),
            customer_name: "Priya S.".to_string(),
            customer_email: "priya@test.com".to_string(),
            items: vec![CartItem {
                book: catalog[4].clone(),
                quantity: 1,
            }],
            total_amount: 800.0,
            status: OrderStatus::Shipped,
            payment_method: "Credit Card".to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, 12, 9, 15, 0).unwrap(),
        },
        Order {
            id: "ORD-003".to_string(),
            customer_name: "David Raj".to_string(),
            customer_email: "david@mail.com".to_string(),
            items: vec![CartItem {
                book: catalog[1].clone(),
                quantity: 1,
            }],
            total_amount: 350.0,
            status: OrderStatus::Pending,
            payment_method: "Net Banking".to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, 14, 11, 20, 0).unwrap(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_totals_match_their_line_items() {
        for order in seed_orders() {
            let computed: f64 = order
                .items
                .iter()
                .map(|i| i.book.price * f64::from(i.quantity))
                .sum();
            assert_eq!(order.total_amount, computed, "order {}", order.id);
        }
    }

    #[test]
    fn seed_catalog_ids_are_unique() {
        let catalog = seed_catalog();
        let mut ids: Vec<&str> = catalog.iter().map(|b| b.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }
}
