#![allow(dead_code)]

pub mod scripted_server;
pub mod socket_guard;
