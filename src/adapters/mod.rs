// Adapters layer: concrete encodings and storage backends behind the domain ports.

pub mod csv_table;
