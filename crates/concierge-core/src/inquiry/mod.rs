//! Contact form inquiries.
//!
//! This module defines the `InquiryRepository` port and the
//! `InquiryService` that validates form input before storing it.

pub mod repository;
pub mod service;
