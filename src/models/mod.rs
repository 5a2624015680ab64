mod fields;
mod person;
mod tag;

pub use fields::{Address, Email, InvalidField, Name, Phone, TagName};
pub use person::Person;
pub use tag::{
    parse_timestamp, EventWindow, Tag, TagKey, TagKind, TagNamespace, TIMESTAMP_FORMAT,
};
