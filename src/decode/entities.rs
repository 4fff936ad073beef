//! Schemas of the standard feed tables.
//!
//! Column names equal the record field names, so each setter is generated from the field
//! identifier and the coercion that fills it.

use crate::coercion::{
    boolean, color, double, enumeration, optional_string, required_enumeration, string, unsigned_int,
};
use crate::enums::{
    DirectionType, DropOffType, ExceptionType, LocationType, PaymentMethodType, PickupType,
    RouteType, WheelchairAccessibilityType,
};
use crate::records::{
    Agency, Calendar, CalendarDate, FareAttribute, FareRule, FeedInfo, Frequency, Route, Shape,
    Stop, StopTime, Transfer, Trip,
};
use crate::sink::FeedSink;

use super::{Entity, EntitySchema};

/// Chain one `.field(..)` per `column => coercion` pair onto a schema.
macro_rules! fields {
    ($schema:expr, { $( $column:ident => $coerce:expr ),+ $(,)? }) => {
        $schema
        $(
            .field(stringify!($column), |record, raw| {
                record.$column = $coerce(raw)?;
                Ok(())
            })
        )+
    };
}

macro_rules! entity {
    ($record:ty, $accept:ident) => {
        impl Entity for $record {
            fn deliver(self, sink: &mut dyn FeedSink) {
                sink.$accept(self);
            }
        }
    };
}

entity!(Agency, accept_agency);
entity!(Stop, accept_stop);
entity!(Route, accept_route);
entity!(Trip, accept_trip);
entity!(StopTime, accept_stop_time);
entity!(Calendar, accept_calendar);
entity!(CalendarDate, accept_calendar_date);
entity!(FareAttribute, accept_fare_attribute);
entity!(FareRule, accept_fare_rule);
entity!(Shape, accept_shape);
entity!(Frequency, accept_frequency);
entity!(FeedInfo, accept_feed_info);
entity!(Transfer, accept_transfer);

pub fn agency_schema() -> EntitySchema<Agency> {
    let schema = EntitySchema::<Agency>::new("agency").required(&[
        "agency_name",
        "agency_url",
        "agency_timezone",
    ]);
    fields!(schema, {
        agency_id => optional_string,
        agency_name => string,
        agency_url => string,
        agency_timezone => string,
        agency_lang => optional_string,
        agency_phone => optional_string,
        agency_fare_url => optional_string,
        agency_email => optional_string,
    })
}

pub fn stop_schema() -> EntitySchema<Stop> {
    let schema = EntitySchema::<Stop>::new("stops").required(&[
        "stop_id",
        "stop_name",
        "stop_lat",
        "stop_lon",
    ]);
    fields!(schema, {
        stop_id => string,
        stop_code => optional_string,
        stop_name => string,
        stop_desc => optional_string,
        stop_lat => double,
        stop_lon => double,
        zone_id => optional_string,
        stop_url => optional_string,
        location_type => enumeration::<LocationType>,
        parent_station => optional_string,
        stop_timezone => optional_string,
        wheelchair_boarding => enumeration::<WheelchairAccessibilityType>,
    })
}

pub fn route_schema() -> EntitySchema<Route> {
    let schema = EntitySchema::<Route>::new("routes").required(&[
        "route_id",
        "route_short_name",
        "route_long_name",
        "route_type",
    ]);
    fields!(schema, {
        route_id => string,
        agency_id => optional_string,
        route_short_name => string,
        route_long_name => string,
        route_desc => optional_string,
        route_type => required_enumeration::<RouteType>,
        route_url => optional_string,
        route_color => color,
        route_text_color => color,
    })
}

pub fn trip_schema() -> EntitySchema<Trip> {
    let schema =
        EntitySchema::<Trip>::new("trips").required(&["route_id", "service_id", "trip_id"]);
    fields!(schema, {
        route_id => string,
        service_id => string,
        trip_id => string,
        trip_headsign => optional_string,
        trip_short_name => optional_string,
        direction_id => enumeration::<DirectionType>,
        block_id => optional_string,
        shape_id => optional_string,
        wheelchair_accessible => enumeration::<WheelchairAccessibilityType>,
    })
}

pub fn stop_time_schema() -> EntitySchema<StopTime> {
    // stop_id is checked twice; repeated required names are no-ops.
    let schema = EntitySchema::<StopTime>::new("stop_times").required(&[
        "trip_id",
        "arrival_time",
        "departure_time",
        "stop_id",
        "stop_sequence",
        "stop_id",
    ]);
    fields!(schema, {
        trip_id => string,
        arrival_time => string,
        departure_time => string,
        stop_id => string,
        stop_sequence => unsigned_int,
        stop_headsign => optional_string,
        pickup_type => enumeration::<PickupType>,
        drop_off_type => enumeration::<DropOffType>,
        shape_dist_traveled => double,
        timepoint => boolean,
    })
}

pub fn calendar_schema() -> EntitySchema<Calendar> {
    let schema = EntitySchema::<Calendar>::new("calendar").required(&[
        "service_id",
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
        "start_date",
        "end_date",
    ]);
    fields!(schema, {
        service_id => string,
        monday => boolean,
        tuesday => boolean,
        wednesday => boolean,
        thursday => boolean,
        friday => boolean,
        saturday => boolean,
        sunday => boolean,
        start_date => string,
        end_date => string,
    })
}

pub fn calendar_date_schema() -> EntitySchema<CalendarDate> {
    let schema = EntitySchema::<CalendarDate>::new("calendar_dates").required(&[
        "service_id",
        "date",
        "exception_type",
    ]);
    fields!(schema, {
        service_id => string,
        date => string,
        exception_type => required_enumeration::<ExceptionType>,
    })
}

pub fn fare_attribute_schema() -> EntitySchema<FareAttribute> {
    let schema = EntitySchema::<FareAttribute>::new("fare_attributes").required(&[
        "fare_id",
        "price",
        "currency_type",
        "payment_method",
        "transfers",
    ]);
    fields!(schema, {
        fare_id => string,
        price => double,
        currency_type => string,
        payment_method => required_enumeration::<PaymentMethodType>,
        transfers => unsigned_int,
        agency_id => optional_string,
        transfer_duration => unsigned_int,
    })
}

pub fn fare_rule_schema() -> EntitySchema<FareRule> {
    let schema = EntitySchema::<FareRule>::new("fare_rules").required(&["fare_id"]);
    fields!(schema, {
        fare_id => string,
        route_id => optional_string,
        origin_id => optional_string,
        destination_id => optional_string,
        contains_id => optional_string,
    })
}

pub fn shape_schema() -> EntitySchema<Shape> {
    let schema = EntitySchema::<Shape>::new("shapes").required(&[
        "shape_id",
        "shape_pt_lat",
        "shape_pt_lon",
        "shape_pt_sequence",
    ]);
    fields!(schema, {
        shape_id => string,
        shape_pt_lat => double,
        shape_pt_lon => double,
        shape_pt_sequence => unsigned_int,
        shape_dist_traveled => double,
    })
}

pub fn frequency_schema() -> EntitySchema<Frequency> {
    let schema = EntitySchema::<Frequency>::new("frequencies").required(&[
        "trip_id",
        "start_time",
        "end_time",
        "headway_secs",
    ]);
    fields!(schema, {
        trip_id => string,
        start_time => string,
        end_time => string,
        headway_secs => unsigned_int,
        exact_times => boolean,
    })
}

pub fn feed_info_schema() -> EntitySchema<FeedInfo> {
    let schema = EntitySchema::<FeedInfo>::new("feed_info").required(&[
        "feed_publisher_name",
        "feed_publisher_url",
        "feed_lang",
    ]);
    fields!(schema, {
        feed_publisher_name => string,
        feed_publisher_url => string,
        feed_lang => string,
        feed_start_date => optional_string,
        feed_end_date => optional_string,
        feed_version => optional_string,
    })
}

pub fn transfer_schema() -> EntitySchema<Transfer> {
    let schema = EntitySchema::<Transfer>::new("transfers").required(&[
        "from_stop_id",
        "to_stop_id",
        "transfer_type",
    ]);
    fields!(schema, {
        from_stop_id => string,
        to_stop_id => string,
        transfer_type => unsigned_int,
        min_transfer_time => unsigned_int,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{EntityDecoder, TableDecoder};
    use crate::enums::Color;
    use crate::sink::Feed;
    use crate::types::{MemorySource, Table, TableSource};

    fn decode<K: Entity>(schema: EntitySchema<K>, rows: &[&[&str]]) -> Feed {
        let name = schema.table();
        let source = MemorySource::new().with_rows(name, rows);
        let mut feed = Feed::new();
        EntityDecoder::new(schema)
            .decode(Table::new(name, source.open(name).unwrap()), &mut feed)
            .unwrap();
        feed
    }

    #[test]
    fn every_required_column_has_a_setter() {
        fn check<K>(schema: EntitySchema<K>) {
            for name in schema.required_fields() {
                assert!(
                    schema.setter(name).is_some(),
                    "{}: required column '{name}' has no setter",
                    schema.table()
                );
            }
        }
        check(agency_schema());
        check(stop_schema());
        check(route_schema());
        check(trip_schema());
        check(stop_time_schema());
        check(calendar_schema());
        check(calendar_date_schema());
        check(fare_attribute_schema());
        check(fare_rule_schema());
        check(shape_schema());
        check(frequency_schema());
        check(feed_info_schema());
        check(transfer_schema());
    }

    #[test]
    fn route_decodes_type_and_colors() {
        let feed = decode(
            route_schema(),
            &[
                &["route_id", "route_short_name", "route_long_name", "route_type", "route_color"],
                &["r1", "1", "Main", "3", "#FF0000"],
            ],
        );
        let route = &feed.routes[0];
        assert_eq!(route.route_type, RouteType::Bus);
        assert_eq!(route.route_color, Some(Color(0xFFFF_0000)));
        assert_eq!(route.route_text_color, None);
    }

    #[test]
    fn stop_time_decodes_numeric_and_enum_fields() {
        let feed = decode(
            stop_time_schema(),
            &[
                &[
                    "trip_id",
                    "arrival_time",
                    "departure_time",
                    "stop_id",
                    "stop_sequence",
                    "pickup_type",
                    "shape_dist_traveled",
                    "timepoint",
                ],
                &["t1", "25:00:00", "25:01:00", "s1", "7", "2", "1.2e1", "0"],
            ],
        );
        let st = &feed.stop_times[0];
        assert_eq!(st.arrival_time, "25:00:00");
        assert_eq!(st.stop_sequence, Some(7));
        assert_eq!(st.pickup_type, Some(PickupType::PhoneAgency));
        assert_eq!(st.drop_off_type, None);
        assert_eq!(st.shape_dist_traveled, Some(12.0));
        assert_eq!(st.timepoint, Some(false));
    }

    #[test]
    fn calendar_and_calendar_dates_decode() {
        let feed = decode(
            calendar_schema(),
            &[
                &[
                    "service_id", "monday", "tuesday", "wednesday", "thursday", "friday",
                    "saturday", "sunday", "start_date", "end_date",
                ],
                &["wk", "1", "1", "1", "1", "1", "0", "0", "20240101", "20241231"],
            ],
        );
        assert_eq!(feed.calendars[0].monday, Some(true));
        assert_eq!(feed.calendars[0].sunday, Some(false));

        let feed = decode(
            calendar_date_schema(),
            &[
                &["service_id", "date", "exception_type"],
                &["wk", "20240101", "2"],
            ],
        );
        assert_eq!(feed.calendar_dates[0].exception_type, ExceptionType::Removed);
    }

    #[test]
    fn fare_attribute_allows_unlimited_transfers() {
        let feed = decode(
            fare_attribute_schema(),
            &[
                &["fare_id", "price", "currency_type", "payment_method", "transfers"],
                &["f1", "2.50", "EUR", "1", ""],
            ],
        );
        let fare = &feed.fare_attributes[0];
        assert_eq!(fare.price, Some(2.5));
        assert_eq!(fare.payment_method, PaymentMethodType::BeforeBoarding);
        assert_eq!(fare.transfers, None);
    }
}
