//! # SheetQA API
//!
//! REST surface over the SheetQA engine:
//!
//! - `POST /upload` - multipart file upload; parses and indexes the table
//! - `POST /ask` - JSON question against the current index
//! - `GET /status` - index readiness and size
//! - `GET /` - static single-page frontend, when a static directory is given

pub mod rest;

pub use rest::RestApi;
