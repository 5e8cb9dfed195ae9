use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Number of rows per page, or every row on a single page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSize {
    Count(usize),
    All,
}

impl PageSize {
    /// Reads the `per_page` query value: `all`, a positive number, or the default.
    pub fn from_query(value: Option<&str>, default: usize) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("all") => PageSize::All,
            Some(v) => match v.parse::<usize>() {
                Ok(n) if n > 0 => PageSize::Count(n),
                _ => PageSize::Count(default.max(1)),
            },
            None => PageSize::Count(default.max(1)),
        }
    }
}

#[derive(Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    /// `None` when every row is shown.
    pub per_page: Option<usize>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };

        let pages = get_pages(total_pages, current_page, 2, 2, 4, 2);

        Self {
            total_items: items.len(),
            items,
            pages,
            page: current_page,
            total_pages,
            per_page: None,
        }
    }
}

/// Slices already-filtered rows into the requested page.
///
/// Pages past the end are clamped to the last page; `PageSize::All` returns
/// every row on page 1.
pub fn paginate<T>(items: Vec<T>, page: usize, size: PageSize) -> Paginated<T> {
    let total_items = items.len();

    let per_page = match size {
        PageSize::All => {
            let mut paginated = Paginated::new(items, 1, usize::from(total_items > 0));
            paginated.total_items = total_items;
            return paginated;
        }
        PageSize::Count(n) => n.max(1),
    };

    let total_pages = total_items.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * per_page;

    let items = items.into_iter().skip(start).take(per_page).collect();

    let mut paginated = Paginated::new(items, page, total_pages);
    paginated.total_items = total_items;
    paginated.per_page = Some(per_page);
    paginated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_marks_gaps() {
        assert_eq!(
            get_pages(20, 10, 2, 2, 4, 2),
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20)
            ]
        );
        assert!(get_pages(0, 1, 2, 2, 4, 2).is_empty());
    }

    #[test]
    fn non_final_pages_are_full_and_final_page_holds_the_rest() {
        let items: Vec<u32> = (1..=23).collect();

        let first = paginate(items.clone(), 1, PageSize::Count(10));
        let last = paginate(items, 3, PageSize::Count(10));

        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_pages, 3);
        assert_eq!(last.items, vec![21, 22, 23]);
        assert_eq!(last.total_items, 23);
    }

    #[test]
    fn concatenated_pages_reproduce_the_input_once() {
        let items: Vec<u32> = (1..=47).collect();
        let size = PageSize::Count(6);
        let total_pages = paginate(items.clone(), 1, size).total_pages;

        let joined: Vec<u32> = (1..=total_pages)
            .flat_map(|page| paginate(items.clone(), page, size).items)
            .collect();

        assert_eq!(joined, items);
    }

    #[test]
    fn all_mode_returns_everything_on_one_page() {
        let items: Vec<u32> = (1..=47).collect();
        let all = paginate(items.clone(), 5, PageSize::All);

        assert_eq!(all.items, items);
        assert_eq!(all.page, 1);
        assert_eq!(all.total_pages, 1);
        assert_eq!(all.per_page, None);
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let items: Vec<u32> = (1..=5).collect();
        assert_eq!(paginate(items.clone(), 99, PageSize::Count(2)).items, vec![5]);
        assert_eq!(paginate(items, 0, PageSize::Count(2)).page, 1);
        assert!(paginate(Vec::<u32>::new(), 3, PageSize::Count(2)).items.is_empty());
    }

    #[test]
    fn page_size_reads_query_values() {
        assert_eq!(PageSize::from_query(Some("ALL"), 20), PageSize::All);
        assert_eq!(PageSize::from_query(Some("50"), 20), PageSize::Count(50));
        assert_eq!(PageSize::from_query(Some("0"), 20), PageSize::Count(20));
        assert_eq!(PageSize::from_query(None, 20), PageSize::Count(20));
    }
}
