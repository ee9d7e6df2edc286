pub mod battery;
pub mod bsp;
pub mod config;
pub mod control;
pub mod edt;
pub mod flashlight;
pub mod lamp;
pub mod notification;
pub mod state;
pub mod table_lamp;
