pub mod telemetry_writer;
