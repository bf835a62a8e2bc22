use competeaware_core::Category;

/// Bootstrap corpus: one exemplar sentence per category.
pub const EXEMPLARS: [(Category, &str); 5] = [
    (
        Category::Pricing,
        "price discount sale offer cheap cost reduction affordable special deal limited time",
    ),
    (
        Category::Campaign,
        "campaign promotion advertise marketing launch event special announcement",
    ),
    (
        Category::ProductRelease,
        "new feature update release version product launch announced innovation",
    ),
    (
        Category::Partnership,
        "partnership collaboration alliance merge joint venture cooperation",
    ),
    (
        Category::Other,
        "company office team hiring news update information blog post",
    ),
];
