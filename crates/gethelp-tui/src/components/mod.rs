pub mod request_list;
