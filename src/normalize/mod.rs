pub mod extract;

use crate::error::NormalizeError;
use crate::models::{Address, Apartments, Area, House, NormalizedRecord, Seller};
use crate::scrapers::RawPage;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Where the search response keeps its offers
pub const ENTITIES_PATH: &str = "response.search.offers.entities";

/// Unit marker meaning `price.valuePerPart` is a price per square meter
const SQUARE_METER: &str = "SQUARE_METER";

const ELEVATOR_PRESENT: &str = "есть";
const ELEVATOR_ABSENT: &str = "нет";

/// Locate the raw entity collection of a page
pub fn entities(page: &RawPage) -> Result<&[Value], NormalizeError> {
    extract::get(page.as_value(), ENTITIES_PATH)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or(NormalizeError::MissingEntities(ENTITIES_PATH))
}

/// Map every raw entity of the page to one record, in source order.
///
/// Fails only when the entity collection itself is missing; individual
/// fields never fail and fall back to null. Output depends only on the
/// arguments, so the same page and stamp always give the same records.
pub fn normalize(
    page: &RawPage,
    harvested_at: DateTime<Utc>,
) -> Result<impl Iterator<Item = NormalizedRecord> + '_, NormalizeError> {
    Ok(entities(page)?
        .iter()
        .map(move |e| normalize_entity(e, harvested_at)))
}

pub fn normalize_entity(e: &Value, harvested_at: DateTime<Utc>) -> NormalizedRecord {
    use extract::{display, first, flag, get, integer, number, text};

    let price_per_m2 = match text(e, "price.unitPerPart").as_deref() {
        Some(SQUARE_METER) => number(e, "price.valuePerPart"),
        _ => None,
    };

    let header = format!(
        "{} м², {}-комнатная",
        display(get(e, "area.value")),
        display(get(e, "roomsTotal")),
    );

    let elevator = flag(e, "building.improvements.LIFT").map(|lift| {
        if lift {
            ELEVATOR_PRESENT.to_string()
        } else {
            ELEVATOR_ABSENT.to_string()
        }
    });

    NormalizedRecord {
        offer_id: text(e, "offerId"),
        url: text(e, "shareUrl"),
        header,
        description: text(e, "description"),
        price: number(e, "price.value"),
        price_per_m2,
        currency: text(e, "price.currency"),
        latitude: number(e, "location.point.latitude"),
        longitude: number(e, "location.point.longitude"),
        created_at: text(e, "creationDate"),
        updated_at: text(e, "updateDate"),
        additional_info: None,
        harvested_at,
        seller: Seller {
            name: text(e, "author.agentName"),
            organization: text(e, "author.organization"),
            category: text(e, "author.category"),
            phones: None,
        },
        house: House {
            address: Address {
                full: text(e, "location.geocoderAddress"),
                short: text(e, "location.address"),
                city: None,
            },
            building_type: text(e, "building.buildingType"),
            built_year: integer(e, "building.builtYear"),
            floors_total: integer(e, "floorsTotal"),
            elevator,
        },
        apartments: Apartments {
            rooms: integer(e, "roomsTotal"),
            floor: first(e, "floorsOffered").and_then(Value::as_i64),
            sale_type: None,
            repairs: None,
            furniture: flag(e, "apartment.improvements.FURNITURE") == Some(true),
            balcony: u8::from(get(e, "house.balconyType").is_some()),
            area: Area {
                total: number(e, "area.value"),
                living: number(e, "livingSpace.value"),
                kitchen: number(e, "kitchenSpace.value"),
            },
        },
    }
}
