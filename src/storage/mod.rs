pub mod settings_file;
