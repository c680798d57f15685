pub mod punch_filter;
