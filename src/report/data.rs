//! Literal findings of the avinashsangle.com indexing audit.
//!
//! Everything the report prints as table rows or list items lives here as plain records, apart
//! from the narrative paragraphs which stay next to the layout code in the parent module.

/// One line of the title-page scorecard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScorecardRow {
    pub category: &'static str,
    /// Severity label, e.g. `CRITICAL` or `OK`.
    pub status: &'static str,
    pub impact: &'static str,
}

/// Canonical tag found on a page versus the one it should carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanonicalRow {
    pub page: &'static str,
    pub current: &'static str,
    pub correct: &'static str,
}

impl CanonicalRow {
    /// A page whose canonical points back at the homepage instead of itself.
    pub fn is_wrong(&self) -> bool {
        self.page != "/" && self.current == HOMEPAGE
    }

    pub fn status(&self) -> &'static str {
        if self.is_wrong() {
            "WRONG"
        } else {
            "OK"
        }
    }
}

/// A Search Console "why pages aren't indexed" reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexingReason {
    pub reason: &'static str,
    pub source: &'static str,
    pub pages: u32,
    /// Cell style of the page count. It does not always follow the severity.
    pub pages_style: &'static str,
    pub severity: &'static str,
}

/// A URL listed by Search Console together with its last crawl date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrawledUrl {
    pub url: &'static str,
    /// `None` when Google has never crawled the URL.
    pub crawled: Option<&'static str>,
}

/// Something the site already gets right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoodItem {
    pub topic: &'static str,
    pub detail: &'static str,
}

/// One step of the action plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionItem {
    pub rank: u8,
    pub priority: &'static str,
    pub action: &'static str,
    pub details: &'static str,
    pub effort: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineEntry {
    pub period: &'static str,
    pub outcome: &'static str,
}

pub const SITE: &str = "avinashsangle.com";
pub const HOMEPAGE: &str = "https://avinashsangle.com/";
pub const REPORT_DATE: &str = "February 8, 2026";
pub const HEADER_DATE: &str = "February 2026";
pub const FRAMEWORK: &str = "Next.js (Static Export) on GitHub Pages";
pub const DATA_UPDATED: &str = "Feb 3, 2026";

pub const PAGES_NOT_INDEXED: u32 = 23;
pub const PAGES_INDEXED: u32 = 12;
pub const TOTAL_CLICKS: u32 = 9;

pub const SCORECARD: &[ScorecardRow] = &[
    ScorecardRow {
        category: "Canonical URLs",
        status: "CRITICAL",
        impact: "12 of 14 pages have wrong canonical pointing to homepage",
    },
    ScorecardRow {
        category: "Google Indexed Pages",
        status: "CRITICAL",
        impact: "Only ~2 of 17 pages indexed (88% missing)",
    },
    ScorecardRow {
        category: "Sitemap.xml",
        status: "OK",
        impact: "Valid, accessible, 14 URLs listed",
    },
    ScorecardRow {
        category: "Robots.txt",
        status: "OK",
        impact: "Properly allows all crawlers",
    },
    ScorecardRow {
        category: "Meta Titles",
        status: "OK",
        impact: "All pages have unique titles",
    },
    ScorecardRow {
        category: "Meta Descriptions",
        status: "OK",
        impact: "All pages have unique descriptions",
    },
    ScorecardRow {
        category: "Robots Meta Tag",
        status: "OK",
        impact: "All pages set to index, follow",
    },
    ScorecardRow {
        category: "JS Bundle Size",
        status: "MEDIUM",
        impact: "~3.2 MB total JS - may slow crawl budget",
    },
    ScorecardRow {
        category: "Showcase Page",
        status: "HIGH",
        impact: "Exists but missing from sitemap",
    },
];

const fn wrong(page: &'static str, correct: &'static str) -> CanonicalRow {
    CanonicalRow {
        page,
        current: HOMEPAGE,
        correct,
    }
}

pub const CANONICALS: &[CanonicalRow] = &[
    CanonicalRow {
        page: "/",
        current: HOMEPAGE,
        correct: HOMEPAGE,
    },
    wrong("/blog/", ".../blog/"),
    CanonicalRow {
        page: "/blog/clawdbot-guide/",
        current: ".../blog/clawdbot-guide/",
        correct: ".../blog/clawdbot-guide/",
    },
    wrong("/blog/method-crm-mcp/", ".../blog/method-crm-mcp/"),
    wrong("/projects/", ".../projects/"),
    wrong("/projects/jenkins-mcp/", ".../projects/jenkins-mcp/"),
    wrong("/projects/reddit-agent/", ".../projects/reddit-agent/"),
    wrong("/projects/calculator-server/", ".../projects/calculator-server/"),
    wrong("/projects/aws-ec2-agent/", ".../projects/aws-ec2-agent/"),
    wrong("/projects/twitter-oauth/", ".../projects/twitter-oauth/"),
    wrong("/projects/method-crm-mcp/", ".../projects/method-crm-mcp/"),
    wrong("/projects/social-media-.../", ".../projects/social-media-.../"),
    wrong("/projects/wp-mcp/", ".../projects/wp-mcp/"),
    wrong("/showcase/", ".../showcase/"),
];

pub const INDEXING_REASONS: &[IndexingReason] = &[
    IndexingReason {
        reason: "Discovered - currently not indexed",
        source: "Google systems",
        pages: 12,
        pages_style: "TableCellRed",
        severity: "CRITICAL",
    },
    IndexingReason {
        reason: "Page with redirect",
        source: "Website",
        pages: 5,
        pages_style: "TableCellRed",
        severity: "HIGH",
    },
    IndexingReason {
        reason: "Not found (404)",
        source: "Website",
        pages: 3,
        pages_style: "TableCellOrange",
        severity: "HIGH",
    },
    IndexingReason {
        reason: "Alternative page with proper canonical tag",
        source: "Website",
        pages: 1,
        pages_style: "TableCellRed",
        severity: "CRITICAL",
    },
    IndexingReason {
        reason: "Redirect error",
        source: "Website",
        pages: 1,
        pages_style: "TableCellOrange",
        severity: "MEDIUM",
    },
    IndexingReason {
        reason: "Crawled - currently not indexed",
        source: "Google systems",
        pages: 1,
        pages_style: "TableCellBold",
        severity: "MEDIUM",
    },
];

const fn never_crawled(url: &'static str) -> CrawledUrl {
    CrawledUrl { url, crawled: None }
}

const fn crawled(url: &'static str, date: &'static str) -> CrawledUrl {
    CrawledUrl {
        url,
        crawled: Some(date),
    }
}

pub const DISCOVERED_NOT_INDEXED: &[CrawledUrl] = &[
    never_crawled("/blog/"),
    never_crawled("/blog/method-crm-mcp/"),
    never_crawled("/projects/"),
    never_crawled("/projects/aws-ec2-agent/"),
    never_crawled("/projects/calculator-server/"),
    never_crawled("/projects/jenkins-chatbot/"),
    never_crawled("/projects/jenkins-mcp/"),
    never_crawled("/projects/method-crm-mcp/"),
    never_crawled("/projects/reddit-agent/"),
    never_crawled("/projects/social-media-auto-poster/"),
    never_crawled("/projects/twitter-oauth/"),
    never_crawled("/projects/wp-mcp/"),
];

pub const REDIRECTS: &[CrawledUrl] = &[
    crawled("http://avinashsangle.com/", "3 Feb 2026"),
    crawled("https://www.avinashsangle.com/", "3 Feb 2026"),
    crawled(".../blog/clawdbot-guide (no trailing slash)", "31 Jan 2026"),
    crawled("http://avinashsangle.com/make-twitter-oauth/", "28 Jan 2026"),
    crawled("http://www.avinashsangle.com/", "15 Jan 2026"),
];

pub const NOT_FOUND: &[CrawledUrl] = &[
    crawled("https://avinashsangle.com/blog.html", "30 Jan 2026"),
    crawled("https://avinashsangle.com/project-aws-ec2-agent.html", "30 Jan 2026"),
    crawled("https://blog.avinashsangle.com/cdn-cgi/l/email-protection", "19 Jan 2026"),
];

pub const BUNDLE_RISKS: &[&str] = &[
    "Consume Googlebot's crawl budget and rendering resources",
    "Slow down page load speed (a ranking factor)",
    "Delay First Contentful Paint and Largest Contentful Paint metrics",
];

pub const WORKING_WELL: &[GoodItem] = &[
    GoodItem {
        topic: "robots.txt",
        detail: "Correctly configured with 'Allow: /' and sitemap reference.",
    },
    GoodItem {
        topic: "sitemap.xml",
        detail: "Valid XML, accessible at /sitemap.xml, lists 14 URLs with lastmod dates and priorities.",
    },
    GoodItem {
        topic: "Meta Titles",
        detail: "Every page has a unique, descriptive title using the Next.js title template.",
    },
    GoodItem {
        topic: "Meta Descriptions",
        detail: "All pages have unique, keyword-rich descriptions (150-160 characters).",
    },
    GoodItem {
        topic: "Robots Meta Tag",
        detail: "All pages correctly set to 'index, follow'.",
    },
    GoodItem {
        topic: "Open Graph Tags",
        detail: "Most pages include OG title, description, URL, and images.",
    },
    GoodItem {
        topic: "Twitter Cards",
        detail: "Homepage and blog posts have proper Twitter card markup.",
    },
    GoodItem {
        topic: "Structured Data",
        detail: "The clawdbot-guide page is exemplary with TechArticle, BreadcrumbList, HowTo, FAQPage, and SoftwareApplication schemas.",
    },
    GoodItem {
        topic: "Static HTML",
        detail: "Since the site uses 'output: export', all content is pre-rendered in HTML. Googlebot can read it without JavaScript rendering.",
    },
    GoodItem {
        topic: "Internal Linking",
        detail: "Navigation and page cross-links use proper <a href> tags.",
    },
    GoodItem {
        topic: "Trailing Slash Consistency",
        detail: "next.config.ts enforces trailing slashes, preventing duplicate URL issues.",
    },
];

pub const ACTION_PLAN: &[ActionItem] = &[
    ActionItem {
        rank: 1,
        priority: "CRITICAL",
        action: "Fix canonical URLs in layout.tsx",
        details: "Remove 'alternates: { canonical: \"/\" }' from src/app/layout.tsx. This single change will fix 12 pages. Rebuild and redeploy the site.",
        effort: "~15 min",
    },
    ActionItem {
        rank: 2,
        priority: "CRITICAL",
        action: "Resubmit sitemap in Search Console",
        details: "After deploying the fix, go to Google Search Console > Sitemaps > resubmit sitemap.xml. Then use 'URL Inspection' to request indexing for each page.",
        effort: "~30 min",
    },
    ActionItem {
        rank: 3,
        priority: "HIGH",
        action: "Add 301 redirects for old URLs",
        details: "Redirect /blog.html to /blog/ and /project-aws-ec2-agent.html to /projects/aws-ec2-agent/. Use Next.js redirects in next.config.ts or a _redirects file for GitHub Pages.",
        effort: "~20 min",
    },
    ActionItem {
        rank: 4,
        priority: "HIGH",
        action: "Fix showcase page",
        details: "Either add /showcase/ to sitemap or set its robots to noindex. Fix the duplicate title.",
        effort: "~10 min",
    },
    ActionItem {
        rank: 5,
        priority: "MEDIUM",
        action: "Add structured data to all project pages",
        details: "The clawdbot-guide page is a great template. Add similar JSON-LD schemas (SoftwareApplication, BreadcrumbList) to all project pages.",
        effort: "~2 hrs",
    },
    ActionItem {
        rank: 6,
        priority: "MEDIUM",
        action: "Optimize JS bundle size",
        details: "Use bundle analyzer to identify and lazy-load heavy libraries. Target less than 1.5 MB total JS.",
        effort: "~3 hrs",
    },
    ActionItem {
        rank: 7,
        priority: "LOW",
        action: "Monitor indexing progress",
        details: "Check Search Console weekly for 4-6 weeks after fixes. Google typically re-crawls and indexes within 1-4 weeks.",
        effort: "Ongoing",
    },
];

pub const TIMELINE: &[TimelineEntry] = &[
    TimelineEntry {
        period: "Week 1",
        outcome: "Deploy canonical fix + resubmit sitemap. Google begins re-crawling.",
    },
    TimelineEntry {
        period: "Week 2-3",
        outcome: "Google processes updated pages. Expect 5-10 pages indexed.",
    },
    TimelineEntry {
        period: "Week 4-6",
        outcome: "Full indexing of all pages. Search Console coverage report shows green.",
    },
    TimelineEntry {
        period: "Month 2+",
        outcome: "Pages start ranking for target keywords. Organic traffic increases.",
    },
];
