//! Built-in technology catalog.
//!
//! The registry starts from these records and the variation table below.
//! Persisted state may override any of them at startup.

use super::{Category, TechType, TechnologyRecord};

/// Alternate spellings, keyed to the canonical name they resolve to.
pub const VARIATIONS: &[(&str, &str)] = &[
    ("nodejs", "node.js"),
    ("node js", "node.js"),
    ("node", "node.js"),
    ("nextjs", "next.js"),
    ("next js", "next.js"),
    ("vuejs", "vue"),
    ("vue js", "vue"),
    ("reactjs", "react"),
    ("react js", "react"),
    ("angularjs", "angular"),
    ("expressjs", "express"),
    ("express js", "express"),
    ("tailwindcss", "tailwind"),
    ("tailwind css", "tailwind"),
    ("semanticui", "semantic ui"),
    ("postgres", "postgresql"),
    ("psql", "postgresql"),
    ("mongo", "mongodb"),
    ("k8s", "kubernetes"),
    ("dockerfile", "docker"),
    ("ror", "rails"),
    ("ruby on rails", "rails"),
    ("springboot", "spring boot"),
    ("py.test", "pytest"),
    ("ts", "typescript"),
    ("js", "javascript"),
    ("amazon web services", "aws"),
    ("google cloud", "gcp"),
    ("google cloud platform", "gcp"),
    ("microsoft azure", "azure"),
    ("gh actions", "github actions"),
    ("elastic search", "elasticsearch"),
];

fn language(name: &str, category: Category, description: &str) -> TechnologyRecord {
    TechnologyRecord::new(name, TechType::Language, category, description)
}

fn framework(name: &str, category: Category, description: &str) -> TechnologyRecord {
    TechnologyRecord::new(name, TechType::Framework, category, description)
}

fn database(name: &str, description: &str) -> TechnologyRecord {
    TechnologyRecord::new(name, TechType::Database, Category::Database, description)
}

fn tool(name: &str, category: Category, description: &str) -> TechnologyRecord {
    TechnologyRecord::new(name, TechType::Tool, category, description)
}

fn service(name: &str, description: &str) -> TechnologyRecord {
    TechnologyRecord::new(name, TechType::Service, Category::Cloud, description)
}

/// GitHub star counts are a point-in-time snapshot; refreshed or saved
/// records replace them.
pub fn seed_records() -> Vec<TechnologyRecord> {
    vec![
        // Languages
        language("python", Category::Backend, "General-purpose language popular for web backends and data work")
            .with_use_cases(&["web", "api", "data", "cli"])
            .with_tags(&["scalable"])
            .with_docs("https://docs.python.org")
            .with_github("https://github.com/python/cpython")
            .with_stars(63_000),
        language("javascript", Category::Frontend, "Language of the web browser")
            .with_use_cases(&["web"])
            .with_docs("https://developer.mozilla.org/docs/Web/JavaScript"),
        language("typescript", Category::Frontend, "Typed superset of JavaScript")
            .with_use_cases(&["web", "api"])
            .with_tags(&["scalable"])
            .with_requires(&["javascript"])
            .with_github("https://github.com/microsoft/TypeScript")
            .with_stars(101_000),
        language("java", Category::Backend, "JVM language for enterprise services")
            .with_use_cases(&["api", "enterprise"])
            .with_tags(&["scalable"]),
        language("golang", Category::Backend, "Compiled language with built-in concurrency")
            .with_use_cases(&["api", "cli"])
            .with_tags(&["scalable"])
            .with_github("https://github.com/golang/go")
            .with_stars(124_000),
        language("rust", Category::Backend, "Systems language focused on safety and performance")
            .with_use_cases(&["api", "cli", "systems"])
            .with_tags(&["scalable"])
            .with_github("https://github.com/rust-lang/rust")
            .with_stars(98_000),
        language("ruby", Category::Backend, "Dynamic language focused on developer happiness")
            .with_use_cases(&["web"])
            .with_github("https://github.com/ruby/ruby")
            .with_stars(22_000),
        language("php", Category::Backend, "Server-side scripting language")
            .with_use_cases(&["web"])
            .with_github("https://github.com/php/php-src")
            .with_stars(38_000),
        language("kotlin", Category::Mobile, "JVM language used for Android apps")
            .with_use_cases(&["mobile", "api"])
            .with_github("https://github.com/JetBrains/kotlin")
            .with_stars(49_000),
        language("swift", Category::Mobile, "Apple platform language")
            .with_use_cases(&["mobile"])
            .with_github("https://github.com/swiftlang/swift")
            .with_stars(67_000),
        // Frontend frameworks
        framework("react", Category::Frontend, "Component-based UI library")
            .with_use_cases(&["web"])
            .with_tags(&["spa", "scalable"])
            .with_requires(&["javascript"])
            .with_package("npm", "react")
            .with_docs("https://react.dev")
            .with_github("https://github.com/facebook/react")
            .with_stars(229_000),
        framework("vue", Category::Frontend, "Progressive UI framework")
            .with_use_cases(&["web"])
            .with_tags(&["spa"])
            .with_requires(&["javascript"])
            .with_package("npm", "vue")
            .with_github("https://github.com/vuejs/core")
            .with_stars(47_000),
        framework("angular", Category::Frontend, "Full-featured TypeScript UI framework")
            .with_use_cases(&["web", "enterprise"])
            .with_tags(&["spa", "scalable"])
            .with_requires(&["typescript"])
            .with_package("npm", "@angular/core")
            .with_github("https://github.com/angular/angular")
            .with_stars(96_000),
        framework("svelte", Category::Frontend, "Compiled UI framework")
            .with_use_cases(&["web"])
            .with_requires(&["javascript"])
            .with_package("npm", "svelte")
            .with_github("https://github.com/sveltejs/svelte")
            .with_stars(80_000),
        framework("next.js", Category::Frontend, "React framework with server rendering")
            .with_use_cases(&["web"])
            .with_tags(&["ssr", "scalable"])
            .with_requires(&["react", "node.js"])
            .with_package("npm", "next")
            .with_github("https://github.com/vercel/next.js")
            .with_stars(127_000),
        // Backend frameworks
        framework("django", Category::Backend, "Batteries-included Python web framework")
            .with_use_cases(&["web", "api"])
            .with_tags(&["scalable"])
            .with_requires(&["python"])
            .with_package("pip", "django")
            .with_docs("https://docs.djangoproject.com")
            .with_github("https://github.com/django/django")
            .with_stars(81_000),
        framework("flask", Category::Backend, "Minimal Python web framework")
            .with_use_cases(&["web", "api"])
            .with_requires(&["python"])
            .with_package("pip", "flask")
            .with_github("https://github.com/pallets/flask")
            .with_stars(68_000),
        framework("fastapi", Category::Backend, "Async Python API framework")
            .with_use_cases(&["api"])
            .with_tags(&["scalable"])
            .with_requires(&["python"])
            .with_package("pip", "fastapi")
            .with_github("https://github.com/fastapi/fastapi")
            .with_stars(78_000),
        framework("express", Category::Backend, "Minimal Node.js web framework")
            .with_use_cases(&["web", "api"])
            .with_requires(&["node.js"])
            .with_package("npm", "express")
            .with_github("https://github.com/expressjs/express")
            .with_stars(65_000),
        framework("spring boot", Category::Backend, "Opinionated Spring application framework")
            .with_use_cases(&["api", "enterprise"])
            .with_tags(&["scalable"])
            .with_requires(&["java"])
            .with_package("maven", "org.springframework.boot:spring-boot")
            .with_github("https://github.com/spring-projects/spring-boot")
            .with_stars(75_000),
        framework("rails", Category::Backend, "Ruby web framework")
            .with_use_cases(&["web"])
            .with_requires(&["ruby"])
            .with_package("gem", "rails")
            .with_github("https://github.com/rails/rails")
            .with_stars(56_000),
        framework("laravel", Category::Backend, "PHP web framework")
            .with_use_cases(&["web"])
            .with_requires(&["php"])
            .with_package("composer", "laravel/framework")
            .with_github("https://github.com/laravel/laravel")
            .with_stars(79_000),
        // Mobile and desktop
        framework("react native", Category::Mobile, "React for native mobile apps")
            .with_use_cases(&["mobile"])
            .with_requires(&["react"])
            .with_package("npm", "react-native")
            .with_github("https://github.com/facebook/react-native")
            .with_stars(119_000),
        framework("flutter", Category::Mobile, "Cross-platform UI toolkit")
            .with_use_cases(&["mobile", "desktop"])
            .with_github("https://github.com/flutter/flutter")
            .with_stars(166_000),
        framework("electron", Category::Desktop, "Desktop apps with web technologies")
            .with_use_cases(&["desktop"])
            .with_requires(&["javascript"])
            .with_package("npm", "electron")
            .with_github("https://github.com/electron/electron")
            .with_stars(114_000),
        // UI libraries
        TechnologyRecord::new("tailwind", TechType::Library, Category::Frontend, "Utility-first CSS framework")
            .with_use_cases(&["web"])
            .with_tags(&["scalable"])
            .with_package("npm", "tailwindcss")
            .with_github("https://github.com/tailwindlabs/tailwindcss")
            .with_stars(83_000),
        TechnologyRecord::new("bootstrap", TechType::Library, Category::Frontend, "CSS component toolkit")
            .with_use_cases(&["web"])
            .with_package("npm", "bootstrap")
            .with_github("https://github.com/twbs/bootstrap")
            .with_stars(171_000),
        TechnologyRecord::new("semantic ui", TechType::Library, Category::Frontend, "Theming-oriented UI component library")
            .with_use_cases(&["web"])
            .with_package("npm", "semantic-ui")
            .with_github("https://github.com/Semantic-Org/Semantic-UI")
            .with_stars(51_000),
        TechnologyRecord::new("jquery", TechType::Library, Category::Frontend, "DOM manipulation library")
            .with_use_cases(&["web"])
            .with_tags(&["legacy"])
            .with_requires(&["javascript"])
            .with_package("npm", "jquery")
            .with_github("https://github.com/jquery/jquery")
            .with_stars(59_000),
        TechnologyRecord::new("graphql", TechType::Library, Category::Backend, "Query language for APIs")
            .with_use_cases(&["api"])
            .with_docs("https://graphql.org/learn"),
        // Databases
        database("postgresql", "Relational database with strong SQL support")
            .with_use_cases(&["web", "api", "enterprise"])
            .with_tags(&["sql", "scalable"])
            .with_docs("https://www.postgresql.org/docs"),
        database("mysql", "Popular relational database")
            .with_use_cases(&["web", "api"])
            .with_tags(&["sql", "scalable"]),
        database("mongodb", "Document-oriented NoSQL database")
            .with_use_cases(&["web", "api"])
            .with_tags(&["nosql", "scalable"])
            .with_github("https://github.com/mongodb/mongo")
            .with_stars(27_000),
        database("redis", "In-memory key-value store")
            .with_use_cases(&["web", "api"])
            .with_tags(&["nosql", "cache", "scalable"])
            .with_github("https://github.com/redis/redis")
            .with_stars(68_000),
        database("sqlite", "Embedded relational database")
            .with_use_cases(&["mobile", "desktop", "cli"])
            .with_tags(&["sql"]),
        database("elasticsearch", "Distributed search engine")
            .with_use_cases(&["data", "enterprise"])
            .with_tags(&["search", "scalable"])
            .with_github("https://github.com/elastic/elasticsearch")
            .with_stars(71_000),
        // Testing
        tool("jest", Category::Testing, "JavaScript testing framework")
            .with_use_cases(&["web"])
            .with_tags(&["scalable"])
            .with_requires(&["javascript"])
            .with_package("npm", "jest")
            .with_github("https://github.com/jestjs/jest")
            .with_stars(44_000),
        tool("pytest", Category::Testing, "Python testing framework")
            .with_use_cases(&["web", "api", "data", "cli"])
            .with_tags(&["scalable"])
            .with_requires(&["python"])
            .with_package("pip", "pytest")
            .with_github("https://github.com/pytest-dev/pytest")
            .with_stars(12_000),
        tool("mocha", Category::Testing, "JavaScript test runner")
            .with_use_cases(&["web", "api"])
            .with_requires(&["javascript"])
            .with_package("npm", "mocha")
            .with_github("https://github.com/mochajs/mocha")
            .with_stars(23_000),
        tool("cypress", Category::Testing, "End-to-end browser testing")
            .with_use_cases(&["web"])
            .with_package("npm", "cypress")
            .with_github("https://github.com/cypress-io/cypress")
            .with_stars(47_000),
        tool("selenium", Category::Testing, "Browser automation")
            .with_use_cases(&["web"])
            .with_tags(&["legacy"])
            .with_github("https://github.com/SeleniumHQ/selenium")
            .with_stars(31_000),
        tool("junit", Category::Testing, "Java unit testing framework")
            .with_use_cases(&["api", "enterprise"])
            .with_requires(&["java"]),
        // DevOps
        tool("docker", Category::Devops, "Container runtime and image format")
            .with_use_cases(&["web", "api", "cli", "enterprise"])
            .with_tags(&["scalable"])
            .with_docs("https://docs.docker.com"),
        tool("kubernetes", Category::Devops, "Container orchestration")
            .with_use_cases(&["api", "enterprise"])
            .with_tags(&["scalable"])
            .with_requires(&["docker"])
            .with_github("https://github.com/kubernetes/kubernetes")
            .with_stars(111_000),
        tool("terraform", Category::Devops, "Infrastructure as code")
            .with_use_cases(&["enterprise"])
            .with_tags(&["scalable"])
            .with_github("https://github.com/hashicorp/terraform")
            .with_stars(43_000),
        tool("jenkins", Category::Devops, "Automation server for CI")
            .with_use_cases(&["enterprise"])
            .with_tags(&["legacy"])
            .with_github("https://github.com/jenkinsci/jenkins")
            .with_stars(23_000),
        tool("github actions", Category::Devops, "CI workflows hosted by GitHub")
            .with_use_cases(&["web", "api", "cli"])
            .with_tags(&["scalable"]),
        tool("ansible", Category::Devops, "Agentless configuration management")
            .with_use_cases(&["enterprise"])
            .with_github("https://github.com/ansible/ansible")
            .with_stars(63_000),
        tool("nginx", Category::Devops, "Web server and reverse proxy")
            .with_use_cases(&["web", "api"])
            .with_tags(&["scalable"])
            .with_github("https://github.com/nginx/nginx")
            .with_stars(23_000),
        // Cloud
        service("aws", "Amazon cloud platform").with_use_cases(&["web", "api", "enterprise", "data"]),
        service("gcp", "Google cloud platform").with_use_cases(&["web", "api", "data"]),
        service("azure", "Microsoft cloud platform").with_use_cases(&["enterprise"]),
        service("heroku", "Application hosting platform").with_use_cases(&["web"]),
        service("vercel", "Frontend hosting platform").with_use_cases(&["web"]),
        // Runtimes
        TechnologyRecord::new("node.js", TechType::Platform, Category::Backend, "JavaScript runtime for servers")
            .with_use_cases(&["web", "api", "cli"])
            .with_tags(&["scalable"])
            .with_requires(&["javascript"])
            .with_github("https://github.com/nodejs/node")
            .with_stars(108_000),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_names_are_unique() {
        let records = seed_records();
        let keys: HashSet<String> = records.iter().map(|r| r.key()).collect();
        assert_eq!(keys.len(), records.len());
    }

    #[test]
    fn test_variations_point_at_seeded_records() {
        let keys: HashSet<String> = seed_records().iter().map(|r| r.key()).collect();
        for (variation, canonical) in VARIATIONS {
            assert!(
                keys.contains(*canonical),
                "variation '{}' targets unknown '{}'",
                variation,
                canonical
            );
        }
    }

    #[test]
    fn test_prerequisites_are_seeded() {
        let keys: HashSet<String> = seed_records().iter().map(|r| r.key()).collect();
        for record in seed_records() {
            for required in &record.ecosystem.requires {
                assert!(keys.contains(required), "{} requires unknown '{}'", record.name, required);
            }
        }
    }

    #[test]
    fn test_popular_records_carry_stars() {
        let records = seed_records();
        let react = records.iter().find(|r| r.name == "react").unwrap();
        assert!(react.stars().is_some_and(|s| s > 100_000));
        assert!(records.iter().filter(|r| r.stars().is_some()).count() > 30);
    }

    #[test]
    fn test_every_core_category_is_seeded() {
        let records = seed_records();
        for category in Category::CORE {
            assert!(records.iter().any(|r| r.category == category));
        }
    }
}
