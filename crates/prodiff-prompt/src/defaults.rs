//! Built-in default templates
//!
//! The output-format section of each template pins the JSON shape the flows
//! decode; edits that change those shapes will surface as extraction or
//! decode failures downstream.

use crate::Task;

/// The built-in template for a task
pub(crate) fn default_template(task: Task) -> &'static str {
    match task {
        Task::Extract => EXTRACT,
        Task::Atomize => ATOMIZE,
        Task::Categorize => CATEGORIZE,
        Task::Differentiate => DIFFERENTIATE,
        Task::Estimate => ESTIMATE,
    }
}

const EXTRACT: &str = r#"You are a product analysis expert.
Extract the following items from the provided material:

- Product name
- Price
- Key specifications (weight, size, features, ...)
- Product features
- Review tendencies (positive / negative)

## Rules
- Write "unknown" where the material lacks the information
- Never guess or speculate
- Only report what the material actually states

## Material
{{text}}

## Output format
Respond in JSON with exactly this structure:
```json
{
  "name": "product name",
  "price": "price as written",
  "specs": {
    "weight": "weight",
    "size": "size",
    "power": "power source"
  },
  "features": ["feature 1", "feature 2"],
  "positives": ["strong point 1", "strong point 2"],
  "negatives": ["weak point 1", "weak point 2"]
}
```"#;

const ATOMIZE: &str = r#"You are a review analysis expert.
Extract the minimal meaning-preserving keywords from the review text below.

## Extraction rules
- A single review may yield several keywords
- Merge keywords with the same meaning ("heavy", "weighty" -> "heavy")
- Extract both positive and negative keywords
- Prefer keywords about product characteristics and functions

## Reviews
{{reviews}}

## Output format
Respond in JSON:
```json
{
  "keywords": [
    {"word": "heavy", "sentiment": "negative", "count": 45},
    {"word": "light", "sentiment": "positive", "count": 30}
  ]
}
```"#;

const CATEGORIZE: &str = r#"You are a data classification expert.
Group the keyword list below into appropriate categories.

## Category examples
- weight and portability
- ease of use
- quietness
- battery
- design and build
- heating capability
- durability
- price and value

## Classification rules
- Each keyword belongs to exactly one category
- Create a new category when none of the examples fit
- Keep category names short

## Keywords
{{keywords}}

## Output format
Respond in JSON:
```json
{
  "categories": [
    {
      "name": "weight and portability",
      "keywords": ["heavy", "light", "portable"]
    }
  ]
}
```"#;

const DIFFERENTIATE: &str = r#"You are a product development expert.
Using the competitor analysis and review analysis below, generate 30 to 50
differentiation ideas.

## Differentiation patterns
- performance_up: strengthen an existing capability
- feature_add: add a capability competitors lack
- combine: merge with another product
- cost_down: remove capability to reduce cost

## Competitor analysis
{{competitors}}

## Review analysis
{{reviews}}

## Output format
Respond in JSON. Each idea needs:
- title: short title of the differentiation
- pattern: performance_up / feature_add / combine / cost_down
- difficulty: low (existing factory capability) / medium (design change) / high (R&D)
- ip: patent / design / null
- effectiveness: 0-100
- eff_type: manifest (visible in reviews) / latent (unarticulated)
- eff_reasons: grounds for the effectiveness estimate
- cost: rough unit cost estimate
- time: rough lead time

```json
{
  "ideas": [
    {
      "title": "Cordless battery unit",
      "pattern": "feature_add",
      "difficulty": "medium",
      "ip": "patent",
      "effectiveness": 78,
      "eff_type": "manifest",
      "eff_reasons": "cord length is the top negative keyword",
      "cost": "1500 yen/unit",
      "time": "6 months"
    }
  ]
}
```"#;

const ESTIMATE: &str = r#"You are a consumer research expert.
For each latent-need idea below, estimate how effective it would be if built,
even though reviews do not mention the need directly.

## Ideas
{{ideas}}

## Output format
Respond in JSON, one entry per idea, same order:
```json
{
  "estimates": [
    {
      "title": "idea title",
      "effectiveness": 65,
      "eff_reasons": "grounds for the estimate"
    }
  ]
}
```"#;
