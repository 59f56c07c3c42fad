pub mod ifconf;
