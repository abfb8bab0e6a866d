use std::cell::RefCell;
use std::rc::Rc;

use harvest_lens::browser::{AddressBar, MemoryHistory};
use harvest_lens::url_state::UrlStateSync;

fn sync(page_url: &str) -> UrlStateSync<MemoryHistory> {
    UrlStateSync::new(MemoryHistory::parse(page_url).unwrap())
}

#[cfg(test)]
mod read {
    use super::*;

    #[test]
    fn test_absent_blank_and_present() {
        assert_eq!(sync("http://page.test/").read_query(), None);
        assert_eq!(sync("http://page.test/?q=").read_query(), None);
        assert_eq!(sync("http://page.test/?q=+++").read_query(), None);
        assert_eq!(sync("http://page.test/?q=shoes").read_query().as_deref(), Some("shoes"));
        assert_eq!(
            sync("http://page.test/?lang=en&q=red%20shoes").read_query().as_deref(),
            Some("red shoes")
        );
    }

    #[test]
    fn test_non_ascii_query() {
        let urls = sync("http://page.test/");
        urls.write_query(Some("чай & кофе"));
        assert_eq!(urls.read_query().as_deref(), Some("чай & кофе"));
    }
}

#[cfg(test)]
mod write {
    use super::*;

    #[test]
    fn test_sets_query_and_pushes_entry_with_state() {
        let urls = sync("http://page.test/search");
        urls.write_query(Some("boots"));

        let history = urls.address_bar();
        assert_eq!(history.len(), 2);
        assert_eq!(history.location().as_str(), "http://page.test/search?q=boots");
        assert_eq!(history.current_state().query.as_deref(), Some("boots"));
    }

    #[test]
    fn test_keeps_other_parameters() {
        let urls = sync("http://page.test/?lang=en&q=old&page=2");
        urls.write_query(Some("new"));
        assert_eq!(
            urls.address_bar().location().as_str(),
            "http://page.test/?lang=en&page=2&q=new"
        );
    }

    #[test]
    fn test_clearing_removes_parameter() {
        let urls = sync("http://page.test/?q=old");
        urls.write_query(None);
        assert_eq!(urls.address_bar().location().as_str(), "http://page.test/");
        assert_eq!(urls.address_bar().current_state().query, None);

        let urls = sync("http://page.test/?lang=en&q=old");
        urls.write_query(None);
        assert_eq!(urls.address_bar().location().as_str(), "http://page.test/?lang=en");
    }

    #[test]
    fn test_same_query_is_not_pushed_twice() {
        let urls = sync("http://page.test/");
        urls.write_query(Some("a"));
        urls.write_query(Some("a"));
        urls.write_query(None);
        urls.write_query(None);
        assert_eq!(urls.address_bar().len(), 3);
    }

    #[test]
    fn test_clearing_removes_blank_parameter() {
        let urls = sync("http://page.test/?lang=en&q=+");
        assert_eq!(urls.read_query(), None);

        urls.write_query(None);
        assert_eq!(urls.address_bar().len(), 2);
        assert_eq!(urls.address_bar().location().as_str(), "http://page.test/?lang=en");
    }
}

#[cfg(test)]
mod navigation {
    use super::*;

    #[test]
    fn test_handlers_receive_query_after_history_moves() {
        let urls = sync("http://page.test/");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        urls.on_navigate(move |q| sink.borrow_mut().push(q));

        urls.write_query(Some("a"));
        urls.write_query(Some("b"));

        assert!(urls.address_bar().back());
        urls.navigated();
        assert!(urls.address_bar().back());
        urls.navigated();
        assert!(urls.address_bar().forward());
        urls.navigated();

        assert_eq!(
            *seen.borrow(),
            vec![Some("a".to_string()), None, Some("a".to_string())]
        );
    }

    #[test]
    fn test_shareable_url_is_canonical() {
        let urls = sync("https://page.test/docs/search?lang=en&q=old#top");
        assert_eq!(
            urls.shareable_url("new query").as_str(),
            "https://page.test/docs/search?q=new%20query"
        );
    }

    #[test]
    fn test_shareable_url_round_trips_reserved_characters() {
        let urls = sync("http://page.test/");
        let shared = urls.shareable_url("a+b & c/d?");
        assert_eq!(shared.as_str(), "http://page.test/?q=a%2Bb%20%26%20c%2Fd%3F");

        let reader = UrlStateSync::new(MemoryHistory::parse(shared.as_str()).unwrap());
        assert_eq!(reader.read_query().as_deref(), Some("a+b & c/d?"));
    }
}
