//! Blog post rendering.
//!
//! Both post types share one fixed template: an intro paragraph, a list of
//! deals, and the affiliate disclosure. With no deals the list is replaced by
//! a "check back later" paragraph.

use crate::models::{FlightDeal, HotelDeal, Post};
use crate::utils::slugify_title;
use chrono::NaiveDate;
use std::fmt::Write;

const DISCLOSURE: &str = "<p class=\"affiliate-disclosure\"><small>Prices were found at the time of writing and change quickly. \
Some links on this page are affiliate links; we may earn a commission if you book through them, at no extra cost to you.</small></p>";

/// Escape text for use inside HTML element content or a quoted attribute.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn short_range(from: NaiveDate, to: NaiveDate) -> String {
    format!("{} – {}", from.format("%b %-d"), to.format("%b %-d, %Y"))
}

fn book_link(url: &str, text: &str) -> String {
    format!(
        "<a href=\"{}\" rel=\"nofollow sponsored\" target=\"_blank\">{}</a>",
        escape_html(url),
        text
    )
}

fn empty_notice(kind: &str) -> String {
    format!(
        "<p class=\"no-deals\">We didn't find any {} deals worth sharing today. Check back later, we look for new prices every day.</p>\n",
        kind
    )
}

fn assemble(intro: &str, items: &[String], kind: &str) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<p>{}</p>", intro);
    if items.is_empty() {
        html.push_str(&empty_notice(kind));
    } else {
        html.push_str("<ul class=\"deal-list\">\n");
        for item in items {
            let _ = writeln!(html, "  <li>{}</li>", item);
        }
        html.push_str("</ul>\n");
    }
    html.push_str(DISCLOSURE);
    html.push('\n');
    html
}

fn flight_item(deal: &FlightDeal) -> String {
    format!(
        "<strong>{} ({}) &rarr; {} ({})</strong>: <span class=\"deal-price\">${}</span> round trip \
<em>(typically ${}, {}% off)</em><br><small>{}</small> {}",
        escape_html(&deal.origin_name),
        escape_html(&deal.origin),
        escape_html(&deal.destination_name),
        escape_html(&deal.destination),
        deal.price,
        deal.typical_price,
        deal.percent_off,
        short_range(deal.depart_date, deal.return_date),
        book_link(&deal.url, "Book this flight"),
    )
}

fn hotel_item(deal: &HotelDeal) -> String {
    let rating = deal
        .rating
        .map(|r| format!(" &middot; rated {:.1}/5", r))
        .unwrap_or_default();
    format!(
        "<strong>{}</strong>, {}: <span class=\"deal-price\">${}</span>/night \
<em>(typically ${}, {}% off)</em>{}<br><small>{}</small> {}",
        escape_html(&deal.name),
        escape_html(&deal.location),
        deal.price,
        deal.typical_price,
        deal.percent_off,
        rating,
        short_range(deal.check_in, deal.check_out),
        book_link(&deal.url, "Check availability"),
    )
}

/// Render the daily flight deals post.
pub fn render_flight_post(deals: &[FlightDeal], date: NaiveDate, category: Option<u64>) -> Post {
    let items: Vec<String> = deals.iter().map(flight_item).collect();
    let intro = format!(
        "Our fare scan for {} turned up {} round-trip {} priced below what these routes usually cost.",
        long_date(date),
        deals.len(),
        if deals.len() == 1 { "fare" } else { "fares" }
    );
    let excerpt = match deals.first() {
        Some(top) => format!(
            "{} flight {} today, led by {} to {} for ${} ({}% off).",
            deals.len(),
            if deals.len() == 1 { "deal" } else { "deals" },
            top.origin_name,
            top.destination_name,
            top.price,
            top.percent_off
        ),
        None => "No flight deals cleared our threshold today. Check back later.".to_string(),
    };

    Post {
        title: format!("Cheap Flight Deals for {}", long_date(date)),
        slug: slugify_title(&format!("flight deals {}", date.format("%Y-%m-%d"))),
        content: assemble(&intro, &items, "flight"),
        excerpt,
        categories: category.into_iter().collect(),
        tags: vec!["flights".to_string(), "travel deals".to_string()],
    }
}

/// Render the daily hotel deals post.
pub fn render_hotel_post(deals: &[HotelDeal], date: NaiveDate, category: Option<u64>) -> Post {
    let items: Vec<String> = deals.iter().map(hotel_item).collect();
    let intro = format!(
        "Our hotel scan for {} found {} {} well below the usual nightly rate or cheap and highly rated.",
        long_date(date),
        deals.len(),
        if deals.len() == 1 { "stay" } else { "stays" }
    );
    let excerpt = match deals.first() {
        Some(top) => format!(
            "{} hotel {} today, led by {} in {} at ${}/night ({}% off).",
            deals.len(),
            if deals.len() == 1 { "deal" } else { "deals" },
            top.name,
            top.location,
            top.price,
            top.percent_off
        ),
        None => "No hotel deals cleared our threshold today. Check back later.".to_string(),
    };

    Post {
        title: format!("Hotel Deals for {}", long_date(date)),
        slug: slugify_title(&format!("hotel deals {}", date.format("%Y-%m-%d"))),
        content: assemble(&intro, &items, "hotel"),
        excerpt,
        categories: category.into_iter().collect(),
        tags: vec!["hotels".to_string(), "travel deals".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn flight() -> FlightDeal {
        FlightDeal {
            origin: "JFK".to_string(),
            origin_name: "New York".to_string(),
            destination: "LHR".to_string(),
            destination_name: "London".to_string(),
            price: 389,
            typical_price: 750,
            percent_off: 48,
            depart_date: date(2026, 11, 5),
            return_date: date(2026, 11, 12),
            url: "https://www.kayak.com/flights/JFK-LHR/2026-11-05/2026-11-12?sort=price_a&affid=t".to_string(),
            scraped_at: Utc::now(),
        }
    }

    fn hotel() -> HotelDeal {
        HotelDeal {
            name: "Tom & Jerry's <Inn>".to_string(),
            location: "Miami".to_string(),
            price: 129,
            typical_price: 230,
            percent_off: 44,
            rating: Some(4.5),
            check_in: date(2026, 10, 29),
            check_out: date(2026, 10, 31),
            url: "https://www.booking.com/searchresults.html?ss=Miami".to_string(),
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_empty_flight_post_has_fallback() {
        let post = render_flight_post(&[], date(2026, 10, 15), Some(3));
        assert!(post.content.contains("Check back later"));
        assert!(!post.content.contains("<ul"));
        assert!(!post.content.contains("<li>"));
        assert_eq!(post.categories, vec![3]);
    }

    #[test]
    fn test_empty_hotel_post_has_fallback() {
        let post = render_hotel_post(&[], date(2026, 10, 15), None);
        assert!(post.content.contains("Check back later"));
        assert!(post.categories.is_empty());
    }

    #[test]
    fn test_flight_post_fields() {
        let post = render_flight_post(&[flight()], date(2026, 10, 15), None);
        assert_eq!(post.title, "Cheap Flight Deals for October 15, 2026");
        assert_eq!(post.slug, "flight-deals-2026-10-15");
        assert_eq!(
            post.excerpt,
            "1 flight deal today, led by New York to London for $389 (48% off)."
        );
        assert!(post.content.contains("<ul class=\"deal-list\">"));
        assert!(post.content.contains("New York (JFK) &rarr; London (LHR)"));
        assert!(post.content.contains("Nov 5 – Nov 12, 2026"));
        assert!(post.content.contains("sort=price_a&amp;affid=t"));
        assert!(post.content.contains("affiliate-disclosure"));
        assert_eq!(post.tags, vec!["flights", "travel deals"]);
    }

    #[test]
    fn test_hotel_post_escapes_names() {
        let post = render_hotel_post(&[hotel()], date(2026, 10, 15), Some(7));
        assert_eq!(post.slug, "hotel-deals-2026-10-15");
        assert!(post.content.contains("Tom &amp; Jerry&#39;s &lt;Inn&gt;"));
        assert!(post.content.contains("rated 4.5/5"));
        assert!(post.content.contains("$129</span>/night"));
        assert_eq!(
            post.excerpt,
            "1 hotel deal today, led by Tom & Jerry's <Inn> in Miami at $129/night (44% off)."
        );
    }

    #[test]
    fn test_items_follow_input_order() {
        let mut second = flight();
        second.destination_name = "Paris".to_string();
        second.destination = "CDG".to_string();
        let post = render_flight_post(&[flight(), second], date(2026, 10, 15), None);
        assert!(post.excerpt.starts_with("2 flight deals today"));
        let london = post.content.find("London").unwrap();
        let paris = post.content.find("Paris").unwrap();
        assert!(london < paris);
    }
}
