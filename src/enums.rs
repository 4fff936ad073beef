//! Closed code enumerations used by feed records.
//!
//! Every enumeration maps a fixed set of literal numeric code strings to a variant. Unknown codes
//! are rejected by [`CodeEnum::from_code`]; there is no catch-all variant.

use std::fmt;

use serde::Serialize;

/// A closed enumeration decoded from literal numeric codes.
pub trait CodeEnum: Sized + Copy {
    /// Enumeration name used in error messages.
    const KIND: &'static str;

    /// Decode a literal code. Returns `None` for codes outside the closed set.
    fn from_code(code: &str) -> Option<Self>;

    /// The literal code of this variant.
    fn code(self) -> &'static str;
}

/// Implements [`CodeEnum`] and `Display` for a code enumeration.
macro_rules! code_enum {
    ($enum_name:ident, $kind:literal, $( $variant:ident => $code:literal ),+ $(,)?) => {
        impl CodeEnum for $enum_name {
            const KIND: &'static str = $kind;

            fn from_code(code: &str) -> Option<Self> {
                match code {
                    $( $code => Some(Self::$variant), )+
                    _ => None,
                }
            }

            fn code(self) -> &'static str {
                match self {
                    $( Self::$variant => $code, )+
                }
            }
        }

        impl fmt::Display for $enum_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

/// Transit mode of a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum RouteType {
    /// Tram, streetcar or light rail.
    #[default]
    Tram,
    /// Subway or metro.
    Subway,
    /// Intercity or long-distance rail.
    Rail,
    Bus,
    Ferry,
    /// Street-level cable car.
    CableCar,
    /// Aerial lift or suspended cable car.
    Gondola,
    Funicular,
}

code_enum!(RouteType, "route type",
    Tram => "0",
    Subway => "1",
    Rail => "2",
    Bus => "3",
    Ferry => "4",
    CableCar => "5",
    Gondola => "6",
    Funicular => "7",
);

/// Whether a calendar date adds or removes service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ExceptionType {
    #[default]
    Added,
    Removed,
}

code_enum!(ExceptionType, "exception type",
    Added => "1",
    Removed => "2",
);

/// When a fare is paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum PaymentMethodType {
    #[default]
    OnBoard,
    BeforeBoarding,
}

code_enum!(PaymentMethodType, "payment method",
    OnBoard => "0",
    BeforeBoarding => "1",
);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum WheelchairAccessibilityType {
    #[default]
    NoInformation,
    Accessible,
    NotAccessible,
}

code_enum!(WheelchairAccessibilityType, "wheelchair accessibility",
    NoInformation => "0",
    Accessible => "1",
    NotAccessible => "2",
);

/// How passengers are picked up at a stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum PickupType {
    #[default]
    Regular,
    NoPickup,
    PhoneAgency,
    CoordinateWithDriver,
}

code_enum!(PickupType, "pickup type",
    Regular => "0",
    NoPickup => "1",
    PhoneAgency => "2",
    CoordinateWithDriver => "3",
);

/// How passengers are dropped off at a stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum DropOffType {
    #[default]
    Regular,
    NoDropOff,
    PhoneAgency,
    CoordinateWithDriver,
}

code_enum!(DropOffType, "drop-off type",
    Regular => "0",
    NoDropOff => "1",
    PhoneAgency => "2",
    CoordinateWithDriver => "3",
);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum LocationType {
    #[default]
    Stop,
    Station,
    EntranceExit,
    GenericNode,
    BoardingArea,
}

code_enum!(LocationType, "location type",
    Stop => "0",
    Station => "1",
    EntranceExit => "2",
    GenericNode => "3",
    BoardingArea => "4",
);

/// Travel direction of a trip, relative to the other direction of the same route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum DirectionType {
    #[default]
    Outbound,
    Inbound,
}

code_enum!(DirectionType, "direction",
    Outbound => "0",
    Inbound => "1",
);

/// An opaque ARGB color packed into 32 bits (`0xAARRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color(pub u32);

impl Color {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(0xFF00_0000 | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b))
    }

    pub fn argb(self) -> u32 {
        self.0
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red(), self.green(), self.blue())
    }
}
