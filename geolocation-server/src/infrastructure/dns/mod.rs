pub mod hickory_reverse_dns;
