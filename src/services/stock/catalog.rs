//! 支持的 NSE 公司目录

use crate::models::Company;

/// NSE 交易所后缀
pub const NSE_SUFFIX: &str = ".NS";

/// 建议列表最大条数
pub const MAX_SUGGESTIONS: usize = 5;

/// 公司目录，顺序即接口返回顺序
pub const COMPANIES: &[Company] = &[
    Company { symbol: "RELIANCE", name: "Reliance Industries" },
    Company { symbol: "TCS", name: "Tata Consultancy Services" },
    Company { symbol: "INFY", name: "Infosys" },
    Company { symbol: "HDFCBANK", name: "HDFC Bank" },
    Company { symbol: "SBIN", name: "State Bank of India" },
    Company { symbol: "TATAMOTORS", name: "Tata Motors" },
    Company { symbol: "TATASTEEL", name: "Tata Steel" },
    Company { symbol: "TATAPOWER", name: "Tata Power" },
    Company { symbol: "TATACONSUM", name: "Tata Consumer Products" },
    Company { symbol: "WIPRO", name: "Wipro" },
    Company { symbol: "ITC", name: "ITC Limited" },
    Company { symbol: "BHARTIARTL", name: "Bharti Airtel" },
    Company { symbol: "KOTAKBANK", name: "Kotak Mahindra Bank" },
    Company { symbol: "MARUTI", name: "Maruti Suzuki" },
    Company { symbol: "TITAN", name: "Titan Company" },
    Company { symbol: "ASIANPAINT", name: "Asian Paints" },
    Company { symbol: "ADANIENT", name: "Adani Enterprises" },
    Company { symbol: "AXISBANK", name: "Axis Bank" },
    Company { symbol: "BAJFINANCE", name: "Bajaj Finance" },
    Company { symbol: "LT", name: "Larsen & Toubro" },
];

/// 转为 NSE 代码，如 tcs -> TCS.NS
pub fn nse_symbol(symbol: &str) -> String {
    format!("{}{}", symbol.to_uppercase(), NSE_SUFFIX)
}

/// 模糊匹配公司
///
/// 查询词（忽略大小写）是代码或名称的子串即命中，按目录顺序最多返回 limit 条
pub fn find_similar(query: &str, limit: usize) -> Vec<Company> {
    let query = query.to_uppercase();
    COMPANIES
        .iter()
        .filter(|c| c.symbol.contains(&query) || c.name.to_uppercase().contains(&query))
        .take(limit)
        .copied()
        .collect()
}
