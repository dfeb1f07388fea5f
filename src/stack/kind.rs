crate::define_kind_enum! {
    /// What a technology is.
    TechType {
        Language => "language" | "lang" | "languages",
        Framework => "framework" | "frameworks",
        Library => "library" | "lib" | "libraries",
        Database => "database" | "db" | "databases",
        Tool => "tool" | "tools",
        Service => "service" | "services",
        Platform => "platform" | "platforms",
    }
}

crate::define_kind_enum! {
    /// Where a technology sits in a stack.
    Category {
        Frontend => "frontend" | "front-end",
        Backend => "backend" | "back-end",
        Database => "database" | "db",
        Testing => "testing" | "test",
        Devops => "devops" | "dev-ops",
        Cloud => "cloud",
        Mobile => "mobile",
        Desktop => "desktop",
        Language => "language",
    }
}

impl Category {
    /// Categories that make up a minimal web stack.
    pub const CORE: [Category; 3] = [Category::Frontend, Category::Backend, Category::Database];

    pub fn is_core(&self) -> bool {
        Self::CORE.contains(self)
    }
}

impl TechType {
    /// Rank used when picking which technology covers a category:
    /// framework or database first, other concrete types next, bare languages last.
    pub fn coverage_rank(&self) -> u8 {
        match self {
            TechType::Framework | TechType::Database => 0,
            TechType::Language => 2,
            _ => 1,
        }
    }
}
