use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seller (listing author) information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub name: Option<String>,
    pub organization: Option<String>,
    pub category: Option<String>,
    /// Not exposed by the search payload
    pub phones: Option<Vec<String>>,
}

/// Postal address of the building
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub full: Option<String>,
    pub short: Option<String>,
    /// Not exposed by the search payload
    pub city: Option<String>,
}

/// Building-level attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub address: Address,
    pub building_type: Option<String>,
    pub built_year: Option<i64>,
    pub floors_total: Option<i64>,
    pub elevator: Option<String>,
}

/// Areas in square meters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub total: Option<f64>,
    pub living: Option<f64>,
    pub kitchen: Option<f64>,
}

/// Apartment-level attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Apartments {
    pub rooms: Option<i64>,
    pub floor: Option<i64>,
    pub sale_type: Option<String>,
    pub repairs: Option<String>,
    pub furniture: bool,
    pub balcony: u8,
    pub area: Area,
}

/// One listing projected onto the fixed output schema.
///
/// The shape never varies between records; only the presence of values does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub offer_id: Option<String>,
    pub url: Option<String>,
    pub header: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub price_per_m2: Option<f64>,
    pub currency: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub additional_info: Option<String>,
    pub harvested_at: DateTime<Utc>,
    pub seller: Seller,
    pub house: House,
    pub apartments: Apartments,
}

impl NormalizedRecord {
    /// Column names of the flattened (delimited) representation
    pub const COLUMNS: [&'static str; 33] = [
        "offer_id",
        "url",
        "header",
        "description",
        "price",
        "price_per_m2",
        "currency",
        "latitude",
        "longitude",
        "created_at",
        "updated_at",
        "additional_info",
        "harvested_at",
        "seller.name",
        "seller.organization",
        "seller.category",
        "seller.phones",
        "house.address.full",
        "house.address.short",
        "house.address.city",
        "house.building_type",
        "house.built_year",
        "house.floors_total",
        "house.elevator",
        "apartments.rooms",
        "apartments.floor",
        "apartments.sale_type",
        "apartments.repairs",
        "apartments.furniture",
        "apartments.balcony",
        "apartments.area.total",
        "apartments.area.living",
        "apartments.area.kitchen",
    ];

    /// Flatten into one row of cells, in `COLUMNS` order. Nulls become empty cells.
    pub fn to_row(&self) -> Vec<String> {
        fn cell<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        vec![
            cell(&self.offer_id),
            cell(&self.url),
            self.header.clone(),
            cell(&self.description),
            cell(&self.price),
            cell(&self.price_per_m2),
            cell(&self.currency),
            cell(&self.latitude),
            cell(&self.longitude),
            cell(&self.created_at),
            cell(&self.updated_at),
            cell(&self.additional_info),
            self.harvested_at.to_rfc3339(),
            cell(&self.seller.name),
            cell(&self.seller.organization),
            cell(&self.seller.category),
            self.seller
                .phones
                .as_ref()
                .map(|p| p.join(","))
                .unwrap_or_default(),
            cell(&self.house.address.full),
            cell(&self.house.address.short),
            cell(&self.house.address.city),
            cell(&self.house.building_type),
            cell(&self.house.built_year),
            cell(&self.house.floors_total),
            cell(&self.house.elevator),
            cell(&self.apartments.rooms),
            cell(&self.apartments.floor),
            cell(&self.apartments.sale_type),
            cell(&self.apartments.repairs),
            self.apartments.furniture.to_string(),
            self.apartments.balcony.to_string(),
            cell(&self.apartments.area.total),
            cell(&self.apartments.area.living),
            cell(&self.apartments.area.kitchen),
        ]
    }
}
