/// 13F-HR institutional holdings from the [SEC]; filing indices, information tables and
/// the fetch loop that turns them into a [`HoldingsDocument`](crate::HoldingsDocument).
///
/// [SEC]: https://www.sec.gov/search-filings/edgar-application-programming-interfaces
pub mod sec;
