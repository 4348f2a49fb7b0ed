mod detail_page_tests;
mod list_page_tests;
