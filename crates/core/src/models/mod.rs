pub mod booking;
pub mod cart;
pub mod checkout;
pub mod payment;
pub mod poi;
pub mod ticket;
pub mod tour;
pub mod user;
