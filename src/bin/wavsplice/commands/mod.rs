pub mod inspect;
pub mod pad;
pub mod repair;
