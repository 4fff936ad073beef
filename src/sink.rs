//! Record sinks.
//!
//! The engine pushes each decoded record into a [`FeedSink`] exactly once, in row order, and
//! never touches it again. Deduplication or overwrite policy belongs to the sink.

use serde::Serialize;

use crate::records::{
    Agency, Calendar, CalendarDate, FareAttribute, FareRule, FeedInfo, Frequency, Route, Shape,
    Stop, StopTime, Transfer, Trip,
};

/// Receiver of decoded records, one `accept_*` per entity kind.
pub trait FeedSink {
    fn accept_agency(&mut self, record: Agency);
    fn accept_stop(&mut self, record: Stop);
    fn accept_route(&mut self, record: Route);
    fn accept_trip(&mut self, record: Trip);
    fn accept_stop_time(&mut self, record: StopTime);
    fn accept_calendar(&mut self, record: Calendar);
    fn accept_calendar_date(&mut self, record: CalendarDate);
    fn accept_fare_attribute(&mut self, record: FareAttribute);
    fn accept_fare_rule(&mut self, record: FareRule);
    fn accept_shape(&mut self, record: Shape);
    fn accept_frequency(&mut self, record: Frequency);
    fn accept_feed_info(&mut self, record: FeedInfo);
    fn accept_transfer(&mut self, record: Transfer);
}

/// In-memory feed: every record kept in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Feed {
    pub agencies: Vec<Agency>,
    pub stops: Vec<Stop>,
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
    pub calendars: Vec<Calendar>,
    pub calendar_dates: Vec<CalendarDate>,
    pub fare_attributes: Vec<FareAttribute>,
    pub fare_rules: Vec<FareRule>,
    pub shapes: Vec<Shape>,
    pub frequencies: Vec<Frequency>,
    pub feed_info: Vec<FeedInfo>,
    pub transfers: Vec<Transfer>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all entity kinds.
    pub fn record_count(&self) -> usize {
        self.agencies.len()
            + self.stops.len()
            + self.routes.len()
            + self.trips.len()
            + self.stop_times.len()
            + self.calendars.len()
            + self.calendar_dates.len()
            + self.fare_attributes.len()
            + self.fare_rules.len()
            + self.shapes.len()
            + self.frequencies.len()
            + self.feed_info.len()
            + self.transfers.len()
    }
}

impl FeedSink for Feed {
    fn accept_agency(&mut self, record: Agency) {
        self.agencies.push(record);
    }

    fn accept_stop(&mut self, record: Stop) {
        self.stops.push(record);
    }

    fn accept_route(&mut self, record: Route) {
        self.routes.push(record);
    }

    fn accept_trip(&mut self, record: Trip) {
        self.trips.push(record);
    }

    fn accept_stop_time(&mut self, record: StopTime) {
        self.stop_times.push(record);
    }

    fn accept_calendar(&mut self, record: Calendar) {
        self.calendars.push(record);
    }

    fn accept_calendar_date(&mut self, record: CalendarDate) {
        self.calendar_dates.push(record);
    }

    fn accept_fare_attribute(&mut self, record: FareAttribute) {
        self.fare_attributes.push(record);
    }

    fn accept_fare_rule(&mut self, record: FareRule) {
        self.fare_rules.push(record);
    }

    fn accept_shape(&mut self, record: Shape) {
        self.shapes.push(record);
    }

    fn accept_frequency(&mut self, record: Frequency) {
        self.frequencies.push(record);
    }

    fn accept_feed_info(&mut self, record: FeedInfo) {
        self.feed_info.push(record);
    }

    fn accept_transfer(&mut self, record: Transfer) {
        self.transfers.push(record);
    }
}
