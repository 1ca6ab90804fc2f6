pub mod birthday_mapper;

pub use birthday_mapper::BirthdayMapper;
