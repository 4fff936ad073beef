//! Decoded feed records, one struct per entity kind.
//!
//! Optional columns are `Option<T>`; `None` means the column was absent or blank. Required string
//! columns are plain `String` and may legitimately be empty.

use serde::Serialize;

use crate::enums::{
    Color, DirectionType, DropOffType, ExceptionType, LocationType, PaymentMethodType,
    PickupType, RouteType, WheelchairAccessibilityType,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Agency {
    pub agency_id: Option<String>,
    pub agency_name: String,
    pub agency_url: String,
    pub agency_timezone: String,
    pub agency_lang: Option<String>,
    pub agency_phone: Option<String>,
    pub agency_fare_url: Option<String>,
    pub agency_email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stop {
    pub stop_id: String,
    pub stop_code: Option<String>,
    pub stop_name: String,
    pub stop_desc: Option<String>,
    pub stop_lat: Option<f64>,
    pub stop_lon: Option<f64>,
    pub zone_id: Option<String>,
    pub stop_url: Option<String>,
    pub location_type: Option<LocationType>,
    pub parent_station: Option<String>,
    pub stop_timezone: Option<String>,
    pub wheelchair_boarding: Option<WheelchairAccessibilityType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Route {
    pub route_id: String,
    pub agency_id: Option<String>,
    pub route_short_name: String,
    pub route_long_name: String,
    pub route_desc: Option<String>,
    pub route_type: RouteType,
    pub route_url: Option<String>,
    pub route_color: Option<Color>,
    pub route_text_color: Option<Color>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trip {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    pub trip_headsign: Option<String>,
    pub trip_short_name: Option<String>,
    pub direction_id: Option<DirectionType>,
    pub block_id: Option<String>,
    pub shape_id: Option<String>,
    pub wheelchair_accessible: Option<WheelchairAccessibilityType>,
}

/// Arrival and departure times are kept verbatim (`HH:MM:SS`, hours may exceed 23).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StopTime {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: Option<u32>,
    pub stop_headsign: Option<String>,
    pub pickup_type: Option<PickupType>,
    pub drop_off_type: Option<DropOffType>,
    pub shape_dist_traveled: Option<f64>,
    pub timepoint: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Calendar {
    pub service_id: String,
    pub monday: Option<bool>,
    pub tuesday: Option<bool>,
    pub wednesday: Option<bool>,
    pub thursday: Option<bool>,
    pub friday: Option<bool>,
    pub saturday: Option<bool>,
    pub sunday: Option<bool>,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CalendarDate {
    pub service_id: String,
    pub date: String,
    pub exception_type: ExceptionType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FareAttribute {
    pub fare_id: String,
    pub price: Option<f64>,
    pub currency_type: String,
    pub payment_method: PaymentMethodType,
    /// Number of transfers permitted; `None` means unlimited.
    pub transfers: Option<u32>,
    pub agency_id: Option<String>,
    pub transfer_duration: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FareRule {
    pub fare_id: String,
    pub route_id: Option<String>,
    pub origin_id: Option<String>,
    pub destination_id: Option<String>,
    pub contains_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Shape {
    pub shape_id: String,
    pub shape_pt_lat: Option<f64>,
    pub shape_pt_lon: Option<f64>,
    pub shape_pt_sequence: Option<u32>,
    pub shape_dist_traveled: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frequency {
    pub trip_id: String,
    pub start_time: String,
    pub end_time: String,
    pub headway_secs: Option<u32>,
    pub exact_times: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedInfo {
    pub feed_publisher_name: String,
    pub feed_publisher_url: String,
    pub feed_lang: String,
    pub feed_start_date: Option<String>,
    pub feed_end_date: Option<String>,
    pub feed_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transfer {
    pub from_stop_id: String,
    pub to_stop_id: String,
    pub transfer_type: Option<u32>,
    pub min_transfer_time: Option<u32>,
}
