//! Unit tests for the project domain, catalog and linkage services.
