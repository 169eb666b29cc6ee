pub mod operator_command;
