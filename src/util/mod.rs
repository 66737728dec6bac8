pub mod spanish_date;
