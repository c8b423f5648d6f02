pub mod http_message_sink;
