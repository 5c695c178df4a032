pub mod http;

// Typed clients, one per backend surface
pub mod auth;
pub mod bookings;
pub mod cart;
pub mod checkout;
pub mod payments;
pub mod pois;
pub mod tickets;
pub mod tours;
