//! 内置的示例活动文案与人设

use crate::models::persona::PersonaDefinition;

/// 默认的信用卡活动文案
pub const DEFAULT_PITCH: &str = r#"
Welcome everyone to our consumer research panel. We are testing a new credit card designed specifically for Californians, called the 'Golden State Rewards Card'.

Here are the full terms of the offer:
- Annual Fee: $95 (Waived for the first year).
- Sign-up Bonus: $300 cash back after spending $1,000 in the first 3 months.
- Rewards Tiers:
    * 4% Cash Back on Gas and EV Charging.
    * 3% Cash Back on Groceries and Farmers Markets.
    * 2% Cash Back on Dining and Food Delivery.
    * 1% Cash Back on everything else.
- APR: 19.99% - 28.99% Variable, based on creditworthiness.
- Special Perk: Annual $50 statement credit toward California State Parks passes.
- No foreign transaction fees.

Please discuss among yourselves:
1. What is your initial reaction to this card based on your lifestyle and income?
2. Does the $300 sign-up bonus and 1st-year fee waiver convince you to try it?
3. How do you feel about the APR and the specific reward categories?
4. Would you actually apply for this card today? If not, what is the exact dealbreaker?
"#;

fn persona(
    name: &str,
    age: u32,
    occupation: &str,
    location: &str,
    income: &str,
    personality: &str,
    spending_habits: &str,
) -> PersonaDefinition {
    PersonaDefinition {
        name: name.to_string(),
        age,
        occupation: occupation.to_string(),
        location: location.to_string(),
        income: income.to_string(),
        personality: personality.to_string(),
        spending_habits: spending_habits.to_string(),
    }
}

/// 默认的八位加州消费者
pub fn default_personas() -> Vec<PersonaDefinition> {
    vec![
        persona(
            "Maria",
            42,
            "Agriculture Operations Manager",
            "Fresno, CA",
            "$85,000/year",
            "Practical, budget-conscious, straightforward, family-oriented.",
            "Spends heavily on gas for her truck commuting to farms, and groceries for her family of four.",
        ),
        persona(
            "Carlos",
            34,
            "Farm Field Supervisor",
            "Visalia, CA",
            "$55,000/year",
            "Hardworking, skeptical of banks, relies on cash but wants to build credit.",
            "High gas spending, buys groceries at local markets, sends money to family. Worried about high interest rates.",
        ),
        persona(
            "Chloe",
            20,
            "Marine Biology Student",
            "Santa Cruz, CA",
            "$12,000/year",
            "Environmentally conscious, social, very budget-restricted.",
            "Rides a bike mostly. Spends on thrift stores, local coffee shops, and campus dining. Hates annual fees.",
        ),
        persona(
            "David",
            22,
            "Business Student",
            "San Luis Obispo, CA",
            "$18,000/year",
            "Ambitious, tech-savvy, impulsive, loves travel hacking.",
            "Spends on dining out, bars, and saving up for flights. Will pay an annual fee if the sign-up bonus is huge.",
        ),
        persona(
            "Sarah",
            35,
            "Registered Nurse",
            "Bakersfield, CA",
            "$95,000/year",
            "Exhausted but organized, values convenience and direct cash rewards.",
            "Long commute to the hospital, buys groceries in bulk at Costco, values cash back over travel points.",
        ),
        persona(
            "James",
            55,
            "Boutique Hotel Owner",
            "Monterey, CA",
            "$150,000/year",
            "Sophisticated, analytical, values premium perks and customer service.",
            "Spends heavily on business supplies, dining with clients, and travel. Doesn't mind annual fees if the perks justify it.",
        ),
        persona(
            "Elena",
            29,
            "Remote Software Developer",
            "Merced, CA",
            "$110,000/year",
            "Introverted, analytical, optimizes everything.",
            "Drives an EV. Spends heavily on online shopping, food delivery, and home improvement. Always pays balance in full.",
        ),
        persona(
            "Robert",
            68,
            "Retired Teacher",
            "Paso Robles, CA",
            "$60,000/year",
            "Cautious, enjoys local leisure, loyal to brands he trusts.",
            "Spends on local dining, wine tasting, and medical expenses. Pays off card monthly. Dislikes complicated reward tiers.",
        ),
    ]
}
