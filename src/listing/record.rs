//! Emitted listing records
//!
//! Field names follow the downstream record contract. Every field is always
//! serialized. Scalar fields carry the value exactly as the server sent it;
//! only an absent (or null) source field is written as `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One flattened marketplace listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: Value,
    pub title: Value,
    pub description: Value,
    pub price: Value,
    pub cities: Vec<CityRecord>,
    pub store: StoreRecord,
    pub default_media: Value,
    pub created_at: Value,
    pub price_preview: Value,
    pub price_unit: Value,

    /// Search page the listing was returned on
    pub page: u32,
}

/// City attached to a listing, with its region name when known
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub id: Value,
    pub name: Value,
    pub region: Value,
}

/// Store that published the listing; all fields are null for private sellers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: Value,
    pub name: Value,
    pub slug: Value,
}

impl StoreRecord {
    /// True when the listing has no store
    pub fn is_empty(&self) -> bool {
        self.id.is_null() && self.name.is_null() && self.slug.is_null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_fields_are_serialized() {
        let record = ListingRecord {
            id: json!(42),
            title: Value::Null,
            description: Value::Null,
            price: json!("Négociable"),
            cities: vec![],
            store: StoreRecord::default(),
            default_media: Value::Null,
            created_at: Value::Null,
            price_preview: Value::Null,
            price_unit: Value::Null,
            page: 1,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 42,
                "title": null,
                "description": null,
                "price": "Négociable",
                "cities": [],
                "store": {"id": null, "name": null, "slug": null},
                "default_media": null,
                "created_at": null,
                "price_preview": null,
                "price_unit": null,
                "page": 1
            })
        );
    }

    #[test]
    fn test_deserializes_emitted_lines() {
        let line = r#"{"id":7,"title":true,"description":null,"price":1.5,"cities":[{"id":"16","name":"Alger","region":null}],"store":{"id":null,"name":null,"slug":null},"default_media":null,"created_at":"2024-01-01","price_preview":250,"price_unit":"MILLION","page":3}"#;
        let record: ListingRecord = serde_json::from_str(line).unwrap();

        assert_eq!(record.id, json!(7));
        assert_eq!(record.title, json!(true));
        assert_eq!(record.price, json!(1.5));
        assert_eq!(record.price_preview, json!(250));
        assert_eq!(record.cities[0].name, json!("Alger"));
        assert!(record.store.is_empty());
        assert_eq!(record.page, 3);
    }

    #[test]
    fn test_store_is_empty() {
        assert!(StoreRecord::default().is_empty());
        assert!(!StoreRecord {
            slug: json!("auto-plus"),
            ..StoreRecord::default()
        }
        .is_empty());
    }
}
